use anyhow::{anyhow, bail};
use serde::{de::Visitor, Deserialize, Deserializer, Serialize};
use serde_with::{DeserializeAs, DeserializeFromStr, SerializeDisplay};
use std::{fmt::Display, marker::PhantomData, str::FromStr};

/// A currency - some type of money.
#[derive(SerializeDisplay, DeserializeFromStr, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Currency {
    USD,
    EUR,
}

impl Default for Currency {
    fn default() -> Self {
        Self::USD
    }
}

impl Currency {
    /// Given a price with a currency symbol and an amount, try to extract a [`Currency`] from the symbol.
    /// Fragments without letters or a currency sign (such as the `,` in `1,200`) are skipped.
    pub fn from_price<S: AsRef<str>>(s: S) -> Option<Self> {
        s.as_ref()
            .split(|c: char| c.is_whitespace() || c.is_numeric())
            .filter(|s| s.chars().any(|c| c.is_alphabetic() || c == '$' || c == '€'))
            .find_map(Self::from_abbreviation)
    }

    /// Given an abbreviation/symbol, try to return the corresponding [`Currency`].
    /// Apart from `€`, only alphabetic characters are considered - `$` is filtered out, for example.
    pub fn from_abbreviation<S: AsRef<str>>(s: S) -> Option<Self> {
        let s = s.as_ref();
        if s.contains('€') {
            return Some(Self::EUR);
        }
        match s
            .chars()
            .flat_map(char::to_lowercase)
            .filter(|c| c.is_alphabetic())
            .collect::<String>()
            .as_str()
        {
            "" | "us" | "usd" => Some(Self::USD),
            "eur" | "euro" | "euros" => Some(Self::EUR),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::USD => "$",
            Self::EUR => "€",
        }
    }
}

impl FromStr for Currency {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::from_abbreviation(s) {
            Some(thing) => Ok(thing),
            None => bail!("no such abbreviation"),
        }
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::USD => "USD",
                Self::EUR => "EUR",
            }
        )
    }
}

/// Convert something like "$312.03" to 312.03
///
/// ## Example
/// ```txt
/// "$312.03"   -> 312.03
/// "312.03"    -> 312.03
/// "312"       -> 312.0
/// "$1,299.99" -> 1299.99
/// ```
pub fn parse_dollars<T: AsRef<str>>(s: T) -> Option<f64> {
    s.as_ref()
        .chars()
        .filter(|c| c.is_numeric() || *c == '.')
        .collect::<String>()
        .parse::<f64>()
        .ok()
}

/// Currency ([`Currency`]), and some amount of it ([`f64`]).
/// Money with no recognizable [`Currency`] is assumed to be USD.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Money(pub Currency, pub f64);

impl FromStr for Money {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cur = Currency::from_price(s).unwrap_or_default();
        let price = s
            .split(char::is_whitespace)
            .find_map(|s| (!s.is_empty()).then(|| parse_dollars(s)).flatten())
            .ok_or_else(|| anyhow!("failed to find price"))?;
        Ok(Self(cur, price))
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{:.2}", self.0.symbol(), self.1)
    }
}

/// Ignore commas when parsing number formats.
/// e.g. 13,096,340.3 -> 13096340.3
pub struct IgnoreComma<T>
where
    T: FromStr,
{
    _t: PhantomData<T>,
}

impl<'de, T> DeserializeAs<'de, T> for IgnoreComma<T>
where
    T: FromStr,
{
    fn deserialize_as<D>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct Helper<TT>
        where
            TT: FromStr,
        {
            _tt: PhantomData<TT>,
        }

        impl<'de, TT> Visitor<'de> for Helper<TT>
        where
            TT: FromStr,
        {
            type Value = TT;

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                TT::from_str(v.replace(',', "").trim())
                    .map_err(|_| E::custom("format error while parsing in IgnoreComma"))
            }

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_fmt(format_args!("a FromStr (probably number), ignoring commas"))
            }
        }

        deserializer.deserialize_str(Helper::<T> { _tt: PhantomData })
    }
}

/// Read a price written as text (`"$1,299.99"`, `"89.90 EUR"`) as its bare amount.
/// The currency part is dropped; catalogs declare a single currency for all of their prices.
pub struct PriceText;

impl<'de> DeserializeAs<'de, f64> for PriceText {
    fn deserialize_as<D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Money::from_str(&text)
            .map(|money| money.1)
            .map_err(serde::de::Error::custom)
    }
}

/// Equality up to a relative error of about 1e-5. Values of opposite sign, or zero
/// against nonzero, are never roughly equal.
pub fn roughly_equal(a: f64, b: f64) -> bool {
    if a == b {
        true
    } else if ((a > 0.0) && (b < 0.0)) || ((a < 0.0) && (b > 0.0)) {
        false
    } else if ((a == 0.0) && (b != 0.0)) || ((a != 0.0) && (b == 0.0)) {
        false
    } else {
        fn dif(x: f64, y: f64) -> f64 {
            (x.abs().ln() - y.abs().ln()).abs()
        }

        dif(a, b) <= dif(1.0, 1.00001)
    }
}
