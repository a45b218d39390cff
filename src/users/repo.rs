use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::dto::ProfileUpdate;

/// One-to-one profile row, keyed by its owner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, FromRow)]
pub struct Profile {
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub display_name: Option<String>,
    pub gender: Option<String>,
    pub age: Option<i32>,
    pub skin_type: Option<String>,
    pub goal: Option<String>,
    pub avatar_url: Option<String>,
}

fn apply<T>(slot: &mut Option<T>, patch: Option<Option<T>>) {
    if let Some(value) = patch {
        *slot = value;
    }
}

impl Profile {
    pub fn empty(user_id: Uuid) -> Self {
        Self {
            user_id,
            ..Self::default()
        }
    }

    /// Overwrite exactly the fields present in `update`.
    pub fn merge(&mut self, update: ProfileUpdate) {
        apply(&mut self.display_name, update.display_name);
        apply(&mut self.gender, update.gender);
        apply(&mut self.age, update.age);
        apply(&mut self.skin_type, update.skin_type);
        apply(&mut self.goal, update.goal);
        apply(&mut self.avatar_url, update.avatar_url);
    }

    pub async fn find(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<Profile>> {
        let row = sqlx::query_as::<_, Profile>(
            r#"
            SELECT user_id, display_name, gender, age, skin_type, goal, avatar_url
            FROM profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn upsert(&self, db: &PgPool) -> anyhow::Result<Profile> {
        let row = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (user_id, display_name, gender, age, skin_type, goal, avatar_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id) DO UPDATE SET
                display_name = EXCLUDED.display_name,
                gender = EXCLUDED.gender,
                age = EXCLUDED.age,
                skin_type = EXCLUDED.skin_type,
                goal = EXCLUDED.goal,
                avatar_url = EXCLUDED.avatar_url
            RETURNING user_id, display_name, gender, age, skin_type, goal, avatar_url
            "#,
        )
        .bind(self.user_id)
        .bind(&self.display_name)
        .bind(&self.gender)
        .bind(self.age)
        .bind(&self.skin_type)
        .bind(&self.goal)
        .bind(&self.avatar_url)
        .fetch_one(db)
        .await?;
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_touches_only_present_fields() {
        let mut profile = Profile {
            display_name: Some("Ohm".into()),
            age: Some(24),
            goal: Some("less acne".into()),
            ..Profile::empty(Uuid::new_v4())
        };
        let update: ProfileUpdate =
            serde_json::from_value(serde_json::json!({ "age": 25, "goal": null, "gender": "male" })).unwrap();
        profile.merge(update);

        assert_eq!(profile.display_name.as_deref(), Some("Ohm"));
        assert_eq!(profile.age, Some(25));
        assert_eq!(profile.goal, None);
        assert_eq!(profile.gender.as_deref(), Some("male"));
        assert_eq!(profile.avatar_url, None);
    }

    #[test]
    fn empty_update_is_a_no_op() {
        let mut profile = Profile {
            skin_type: Some("oily".into()),
            ..Profile::empty(Uuid::new_v4())
        };
        let before = profile.clone();
        profile.merge(serde_json::from_str("{}").unwrap());
        assert_eq!(profile, before);
    }
}
