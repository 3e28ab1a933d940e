use anyhow::Context;
use sqlx::{PgPool, Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::Profile;
use crate::metrics::{Anthropometrics, BodyMetrics};

const PROFILE_COLUMNS: &str = "user_id, full_name, age, sex, height_cm, weight_kg, activity_level, \
                               bmi, bmr, tdee, updated_at";

/// Profile of a user, if one was ever saved.
pub async fn find_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<Profile>> {
    let sql = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = $1");
    let row = sqlx::query_as::<_, Profile>(&sql)
        .bind(user_id)
        .fetch_optional(db)
        .await
        .context("select profile")?;
    Ok(row)
}

/// Insert or replace the profile together with its freshly computed metrics.
pub async fn upsert_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    full_name: &str,
    input: &Anthropometrics,
    sex_code: &str,
    metrics: &BodyMetrics,
) -> anyhow::Result<Profile> {
    let sql = format!(
        r#"
        INSERT INTO profiles (user_id, full_name, age, sex, height_cm, weight_kg, activity_level,
                              bmi, bmr, tdee, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, now())
        ON CONFLICT (user_id) DO UPDATE
           SET full_name = EXCLUDED.full_name,
               age = EXCLUDED.age,
               sex = EXCLUDED.sex,
               height_cm = EXCLUDED.height_cm,
               weight_kg = EXCLUDED.weight_kg,
               activity_level = EXCLUDED.activity_level,
               bmi = EXCLUDED.bmi,
               bmr = EXCLUDED.bmr,
               tdee = EXCLUDED.tdee,
               updated_at = now()
        RETURNING {PROFILE_COLUMNS}
        "#
    );
    let profile = sqlx::query_as::<_, Profile>(&sql)
        .bind(user_id)
        .bind(full_name)
        .bind(input.age)
        .bind(sex_code)
        .bind(input.height_cm)
        .bind(input.weight_kg)
        .bind(input.activity_level.as_str())
        .bind(metrics.bmi)
        .bind(metrics.bmr)
        .bind(metrics.tdee)
        .fetch_one(&mut **tx)
        .await
        .context("upsert profile")?;
    Ok(profile)
}

/// Inserts a default profile unless one already exists. Never overwrites a saved profile.
pub async fn insert_default(
    db: &PgPool,
    user_id: Uuid,
    input: &Anthropometrics,
    sex_code: &str,
    metrics: &BodyMetrics,
) -> anyhow::Result<()> {
    sqlx::query(INSERT_DEFAULT_SQL)
        .bind(user_id)
        .bind(input.age)
        .bind(sex_code)
        .bind(input.height_cm)
        .bind(input.weight_kg)
        .bind(input.activity_level.as_str())
        .bind(metrics.bmi)
        .bind(metrics.bmr)
        .bind(metrics.tdee)
        .execute(db)
        .await
        .context("insert default profile")?;
    Ok(())
}

const INSERT_DEFAULT_SQL: &str = r#"
    INSERT INTO profiles (user_id, full_name, age, sex, height_cm, weight_kg, activity_level,
                          bmi, bmr, tdee, updated_at)
    VALUES ($1, '', $2, $3, $4, $5, $6, $7, $8, $9, now())
    ON CONFLICT (user_id) DO NOTHING
"#;

/// Rewrites the cached metrics if the row is still the version that was read.
pub async fn refresh_metrics(
    db: &PgPool,
    user_id: Uuid,
    seen_updated_at: OffsetDateTime,
    metrics: &BodyMetrics,
) -> anyhow::Result<Option<Profile>> {
    let sql = format!(
        r#"
        UPDATE profiles
           SET bmi = $3, bmr = $4, tdee = $5
         WHERE user_id = $1 AND updated_at = $2
        RETURNING {PROFILE_COLUMNS}
        "#
    );
    let row = sqlx::query_as::<_, Profile>(&sql)
        .bind(user_id)
        .bind(seen_updated_at)
        .bind(metrics.bmi)
        .bind(metrics.bmr)
        .bind(metrics.tdee)
        .fetch_optional(db)
        .await
        .context("refresh profile metrics")?;
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_insert_keeps_existing_rows() {
        assert!(INSERT_DEFAULT_SQL.contains("ON CONFLICT (user_id) DO NOTHING"));
        assert!(!INSERT_DEFAULT_SQL.contains("DO UPDATE"));
    }

    // Needs a Postgres reachable through DATABASE_URL.
    #[sqlx::test(migrations = "./migrations")]
    #[ignore]
    async fn default_insert_after_a_save_is_a_no_op(db: PgPool) {
        let user_id = Uuid::new_v4();
        let saved = Anthropometrics {
            age: 40,
            weight_kg: 92.0,
            ..crate::profiles::services::default_anthropometrics()
        };
        let mut tx = db.begin().await.unwrap();
        upsert_tx(&mut tx, user_id, "Kim", &saved, "M", &crate::metrics::recalc(&saved))
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let defaults = crate::profiles::services::default_anthropometrics();
        insert_default(&db, user_id, &defaults, "M", &crate::metrics::recalc(&defaults))
            .await
            .unwrap();

        let p = find_by_user(&db, user_id).await.unwrap().unwrap();
        assert_eq!((p.age, p.weight_kg, p.full_name.as_str()), (40, 92.0, "Kim"));
    }
}
