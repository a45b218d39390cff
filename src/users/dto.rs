use serde::{Deserialize, Deserializer};

/// Distinguish an absent field (`None`) from an explicit `null` (`Some(None)`).
fn present<'de, D, T>(d: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(d).map(Some)
}

/// Partial profile update for `PUT /users/me`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileUpdate {
    #[serde(default, deserialize_with = "present")]
    pub display_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub gender: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub age: Option<Option<i32>>,
    #[serde(default, deserialize_with = "present")]
    pub skin_type: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub goal: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub avatar_url: Option<Option<String>>,
}

impl ProfileUpdate {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(Some(age)) = self.age {
            if !(0..=150).contains(&age) {
                return Err("age must be between 0 and 150".into());
            }
        }
        if let Some(Some(gender)) = &self.gender {
            if !matches!(gender.as_str(), "male" | "female" | "other") {
                return Err("gender must be male, female or other".into());
            }
        }
        if let Some(Some(skin_type)) = &self.skin_type {
            if !matches!(skin_type.as_str(), "dry" | "oily" | "combination" | "sensitive") {
                return Err("skin_type must be dry, oily, combination or sensitive".into());
            }
        }
        Ok(())
    }
}
