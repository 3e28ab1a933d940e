use anyhow::Context;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::repo;
use super::repo_types::Profile;
use crate::metrics::{self, ActivityLevel, Anthropometrics, BodyMetrics, Sex};

/// Defaults a profile starts from when the user has never edited it.
pub fn default_anthropometrics() -> Anthropometrics {
    Anthropometrics {
        age: 18,
        sex: Some(Sex::Male),
        height_cm: 170.0,
        weight_kg: 65.0,
        activity_level: ActivityLevel::Light,
    }
}

/// Recomputes the metrics and persists them with the inputs in one transaction.
pub async fn save(
    db: &PgPool,
    user_id: Uuid,
    full_name: &str,
    input: &Anthropometrics,
) -> anyhow::Result<Profile> {
    let derived = metrics::recalc(input);
    let sex_code = input.sex.map(Sex::code).unwrap_or("");

    let mut tx = db.begin().await?;
    let profile = repo::upsert_tx(&mut tx, user_id, full_name, input, sex_code, &derived).await?;
    tx.commit().await?;

    info!(%user_id, bmi = derived.bmi, bmr = derived.bmr, tdee = derived.tdee, "profile saved");
    Ok(profile)
}

/// Metrics recomputed from the stored inputs, when they differ from the cached ones.
/// Unknown sex codes give zero BMR/TDEE; unknown activity levels count as light.
pub fn stale_metrics(profile: &Profile) -> Option<BodyMetrics> {
    let fresh = metrics::recalc(&profile.anthropometrics());
    (fresh != profile.metrics()).then_some(fresh)
}

pub async fn get_or_create(db: &PgPool, user_id: Uuid) -> anyhow::Result<Profile> {
    let profile = match repo::find_by_user(db, user_id).await? {
        Some(p) => p,
        None => {
            let input = default_anthropometrics();
            let sex_code = input.sex.map(Sex::code).unwrap_or("");
            repo::insert_default(db, user_id, &input, sex_code, &metrics::recalc(&input)).await?;
            repo::find_by_user(db, user_id)
                .await?
                .context("profile missing after insert")?
        }
    };

    let Some(fresh) = stale_metrics(&profile) else {
        return Ok(profile);
    };
    // Lost the race to a concurrent save: that row already carries fresh metrics.
    match repo::refresh_metrics(db, user_id, profile.updated_at, &fresh).await? {
        Some(p) => {
            info!(%user_id, bmr = fresh.bmr, tdee = fresh.tdee, "stale profile metrics refreshed");
            Ok(p)
        }
        None => repo::find_by_user(db, user_id)
            .await?
            .context("profile missing after refresh"),
    }
}

/// TDEE of an optional profile; absent profiles count as "not available" (0).
pub fn tdee_of(profile: Option<&Profile>) -> f64 {
    profile.map(|p| p.tdee).filter(|t| *t > 0.0).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_has_metrics() {
        let m = metrics::recalc(&default_anthropometrics());
        // 650 + 1062.5 - 90 + 5
        assert_eq!(m.bmr, 1628.0);
        assert_eq!(m.tdee, 2239.0);
        assert!(m.bmi > 22.0 && m.bmi < 23.0);
    }

    fn stored(sex: &str, activity_level: &str, bmr: f64, tdee: f64) -> Profile {
        Profile {
            user_id: Uuid::new_v4(),
            full_name: String::new(),
            age: 25,
            sex: sex.into(),
            height_cm: 170.0,
            weight_kg: 70.0,
            activity_level: activity_level.into(),
            bmi: 24.22,
            bmr,
            tdee,
            updated_at: time::OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn consistent_row_is_not_stale() {
        assert_eq!(stale_metrics(&stored("M", "light", 1643.0, 2259.0)), None);
    }

    #[test]
    fn unknown_activity_level_is_recomputed_as_light() {
        let fresh = stale_metrics(&stored("M", "couch", 1643.0, 0.0)).unwrap();
        assert_eq!(fresh.tdee, 2259.0);
    }

    #[test]
    fn unrecognised_sex_zeroes_energy_metrics() {
        let fresh = stale_metrics(&stored("X", "light", 1643.0, 2259.0)).unwrap();
        assert_eq!((fresh.bmi, fresh.bmr, fresh.tdee), (24.22, 0.0, 0.0));
    }

    #[test]
    fn missing_profile_means_no_tdee() {
        assert_eq!(tdee_of(None), 0.0);
    }
}
