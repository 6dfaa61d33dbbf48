use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::{EnumMessage, IntoEnumIterator};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

use crate::error::ParamError;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter, AsRefStr,
    IntoStaticStr, EnumMessage,
)]
pub enum SceneTime {
    #[default]
    #[strum(to_string = "daytime", message = "Daytime")]
    Daytime,
    #[strum(to_string = "sunset", message = "Sunset")]
    Sunset,
    #[strum(to_string = "sunrise", message = "Sunrise")]
    Sunrise,
    #[strum(to_string = "nighttime", message = "Nighttime")]
    Nighttime,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter, AsRefStr,
    IntoStaticStr, EnumMessage,
)]
pub enum Setting {
    #[default]
    #[strum(to_string = "city skyline", message = "City Skyline")]
    CitySkyline,
    #[strum(to_string = "mountains", message = "Mountains")]
    Mountains,
    #[strum(to_string = "canyon", message = "Canyon")]
    Canyon,
    #[strum(to_string = "grassland", message = "Grassland")]
    Grassland,
    #[strum(to_string = "forest/trees", message = "Forest / Trees")]
    Forest,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter, AsRefStr,
    IntoStaticStr, EnumMessage,
)]
pub enum Ambiance {
    #[default]
    #[strum(to_string = "calm", message = "Calm")]
    Calm,
    #[strum(to_string = "cinematic", message = "Cinematic")]
    Cinematic,
    #[strum(to_string = "moody", message = "Moody")]
    Moody,
    #[strum(to_string = "dreamy", message = "Dreamy")]
    Dreamy,
    #[strum(to_string = "intense", message = "Intense")]
    Intense,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter, AsRefStr,
    IntoStaticStr, EnumMessage,
)]
pub enum Lighting {
    #[default]
    #[strum(to_string = "natural lighting", message = "Natural Lighting")]
    Natural,
    #[strum(to_string = "soft shadows", message = "Soft Shadows")]
    SoftShadows,
    #[strum(to_string = "high contrast", message = "High Contrast")]
    HighContrast,
    #[strum(to_string = "glow", message = "Glow")]
    Glow,
    #[strum(to_string = "overcast", message = "Overcast")]
    Overcast,
}

// The API takes the lowercase wire strings, not the variant names.
macro_rules! wire_string {
    ($($ty:ty),*) => {$(
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_ref())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse()
                    .map_err(|_| serde::de::Error::custom(format!("unknown value: {}", raw)))
            }
        }
    )*};
}

wire_string!(SceneTime, Setting, Ambiance, Lighting);

/// Names of the scene fields, as used in form inputs and in the request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum ParamName {
    Time,
    Setting,
    Ambiance,
    Lighting,
}

impl ParamName {
    pub fn all() -> impl Iterator<Item = ParamName> {
        ParamName::iter()
    }
}

/// One selectable entry of a scene field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamOption {
    pub value: &'static str,
    pub label: &'static str,
}

fn options_of<E>() -> Vec<ParamOption>
where
    E: IntoEnumIterator + EnumMessage + Into<&'static str> + Copy,
{
    E::iter()
        .map(|variant| ParamOption {
            value: variant.into(),
            label: variant.get_message().unwrap_or_default(),
        })
        .collect()
}

/// Scene description sent to the generation API alongside the image URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GenerationParameters {
    pub time: SceneTime,
    pub setting: Setting,
    pub ambiance: Ambiance,
    pub lighting: Lighting,
}

impl GenerationParameters {
    /// Current wire value of the named field.
    pub fn value(&self, name: ParamName) -> &'static str {
        match name {
            ParamName::Time => self.time.into(),
            ParamName::Setting => self.setting.into(),
            ParamName::Ambiance => self.ambiance.into(),
            ParamName::Lighting => self.lighting.into(),
        }
    }

    pub fn options(name: ParamName) -> Vec<ParamOption> {
        match name {
            ParamName::Time => options_of::<SceneTime>(),
            ParamName::Setting => options_of::<Setting>(),
            ParamName::Ambiance => options_of::<Ambiance>(),
            ParamName::Lighting => options_of::<Lighting>(),
        }
    }

    /// Sets a field from its form name and wire value.
    ///
    /// Returns whether the stored value changed. Unknown names or values leave
    /// the parameters untouched.
    pub fn set(&mut self, name: &str, value: &str) -> Result<bool, ParamError> {
        let field: ParamName = name
            .parse()
            .map_err(|_| ParamError::UnknownName(name.to_string()))?;
        let invalid = || ParamError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
        };

        let before = *self;
        match field {
            ParamName::Time => self.time = value.parse().map_err(|_| invalid())?,
            ParamName::Setting => self.setting = value.parse().map_err(|_| invalid())?,
            ParamName::Ambiance => self.ambiance = value.parse().map_err(|_| invalid())?,
            ParamName::Lighting => self.lighting = value.parse().map_err(|_| invalid())?,
        }
        Ok(before != *self)
    }
}
