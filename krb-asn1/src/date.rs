use serde::{de, ser};
use std::fmt;

const GENERALIZED_TIME_LEN: usize = 15;

/// UTC date and time with a precision of one second, encoded as an ASN.1 GeneralizedTime.
///
/// Only the DER profile is supported: `YYYYMMDDHHMMSSZ`, no fractional seconds, no offset.
/// This is the form mandated for `KerberosTime`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GeneralizedTime {
    year: u16,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
}

impl GeneralizedTime {
    pub fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Option<Self> {
        if year <= 9999
            && (1..=12).contains(&month)
            && (1..=days_in_month(year, month)).contains(&day)
            && hour < 24
            && minute < 60
            && second < 60
        {
            Some(Self {
                year,
                month,
                day,
                hour,
                minute,
                second,
            })
        } else {
            None
        }
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn second(&self) -> u8 {
        self.second
    }
}

fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        2 if year % 4 == 0 && (year % 100 != 0 || year % 400 == 0) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// The year of a date lies outside `0..=9999` and has no GeneralizedTime form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearOutOfRange(pub i32);

impl fmt::Display for YearOutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "year {} is outside 0..=9999", self.0)
    }
}

impl std::error::Error for YearOutOfRange {}

trait DateDigitReader {
    fn read_digit(&self, idx: usize) -> u8;

    #[inline]
    fn read_and_merge_with_next(&self, idx: usize) -> u8 {
        self.read_digit(idx) * 10 + self.read_digit(idx + 1)
    }
}

impl DateDigitReader for [u8] {
    #[inline]
    fn read_digit(&self, idx: usize) -> u8 {
        self[idx] & 0x0F
    }
}

impl ser::Serialize for GeneralizedTime {
    fn serialize<S>(&self, serializer: S) -> Result<<S as ser::Serializer>::Ok, <S as ser::Serializer>::Error>
    where
        S: ser::Serializer,
    {
        let mut encoded = [
            0x30, 0x30, 0x30, 0x30, 0x30, 0x30, 0x30, 0x30, 0x30, 0x30, 0x30, 0x30, 0x30, 0x30, 0x5A,
        ];

        encoded[0] |= (self.year / 1000) as u8;
        encoded[1] |= ((self.year % 1000) / 100) as u8;
        encoded[2] |= ((self.year % 100) / 10) as u8;
        encoded[3] |= (self.year % 10) as u8;
        encoded[4] |= self.month / 10;
        encoded[5] |= self.month % 10;
        encoded[6] |= self.day / 10;
        encoded[7] |= self.day % 10;
        encoded[8] |= self.hour / 10;
        encoded[9] |= self.hour % 10;
        encoded[10] |= self.minute / 10;
        encoded[11] |= self.minute % 10;
        encoded[12] |= self.second / 10;
        encoded[13] |= self.second % 10;

        serializer.serialize_bytes(&encoded)
    }
}

impl<'de> de::Deserialize<'de> for GeneralizedTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, <D as de::Deserializer<'de>>::Error>
    where
        D: de::Deserializer<'de>,
    {
        struct Visitor;

        impl<'de> de::Visitor<'de> for Visitor {
            type Value = GeneralizedTime;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a valid buffer representing an Asn1 GeneralizedTime")
            }

            fn visit_bytes<E>(self, v: &[u8]) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                if v.len() != GENERALIZED_TIME_LEN
                    || v[GENERALIZED_TIME_LEN - 1] != b'Z'
                    || !v[..GENERALIZED_TIME_LEN - 1].iter().all(u8::is_ascii_digit)
                {
                    return Err(E::invalid_value(
                        de::Unexpected::Other("unsupported date format"),
                        &"a GeneralizedTime of the form YYYYMMDDHHMMSSZ",
                    ));
                }

                let yyyy = v.read_and_merge_with_next(0) as u16 * 100 + v.read_and_merge_with_next(2) as u16;
                let month = v.read_and_merge_with_next(4);
                let day = v.read_and_merge_with_next(6);
                let hour = v.read_and_merge_with_next(8);
                let minute = v.read_and_merge_with_next(10);
                let second = v.read_and_merge_with_next(12);

                GeneralizedTime::new(yyyy, month, day, hour, minute, second).ok_or_else(|| {
                    E::invalid_value(
                        de::Unexpected::Other("invalid parameters provided to GeneralizedTime constructor"),
                        &"valid parameters for GeneralizedTime",
                    )
                })
            }
        }

        deserializer.deserialize_bytes(Visitor)
    }
}

#[cfg(feature = "time_conversion")]
mod time_conversion {
    use super::{GeneralizedTime, YearOutOfRange};
    use time::error::ComponentRange;
    use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

    impl TryFrom<OffsetDateTime> for GeneralizedTime {
        type Error = YearOutOfRange;

        fn try_from(d: OffsetDateTime) -> Result<Self, Self::Error> {
            let d = d.to_offset(UtcOffset::UTC);
            let year = u16::try_from(d.year())
                .ok()
                .filter(|year| *year <= 9999)
                .ok_or(YearOutOfRange(d.year()))?;

            Ok(Self {
                year,
                month: u8::from(d.month()),
                day: d.day(),
                hour: d.hour(),
                minute: d.minute(),
                second: d.second(),
            })
        }
    }

    impl TryFrom<GeneralizedTime> for OffsetDateTime {
        type Error = ComponentRange;

        fn try_from(d: GeneralizedTime) -> Result<Self, Self::Error> {
            let date = Date::from_calendar_date(i32::from(d.year), Month::try_from(d.month)?, d.day)?;
            let time = Time::from_hms(d.hour, d.minute, d.second)?;
            Ok(PrimitiveDateTime::new(date, time).assume_utc())
        }
    }
}
