//! Keyword-matched answers about body metrics, food, training and goals.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::goals::GoalType;
use crate::metrics::{BmiClass, BodyMetrics};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Medical,
    Bmi,
    Bmr,
    Tdee,
    Nutrition,
    Workout,
    Goal,
}

lazy_static! {
    // First match wins; medical questions are caught before anything else.
    static ref TOPICS: Vec<(Topic, Regex)> = vec![
        (Topic::Medical, Regex::new(r"(?i)\b(diagnos\w*|disease|medicine|medication|drugs?|pills?|prescri\w*|symptoms?)\b").unwrap()),
        (Topic::Bmi, Regex::new(r"(?i)\b(bmi|body mass)\b").unwrap()),
        (Topic::Bmr, Regex::new(r"(?i)\b(bmr|basal|metabolic rate|mifflin)\b").unwrap()),
        (Topic::Tdee, Regex::new(r"(?i)\b(tdee|maintenance|daily energy|calories? per day)\b").unwrap()),
        (Topic::Goal, Regex::new(r"(?i)\b(goals?|lose weight|gain weight|weight loss|deadline|target weight)\b").unwrap()),
        (Topic::Workout, Regex::new(r"(?i)\b(workouts?|exercis\w*|training|run\w*|walk\w*|gym|yoga|bike|cycling|steps?|burn\w*)\b").unwrap()),
        (Topic::Nutrition, Regex::new(r"(?i)\b(eat\w*|food|meals?|diet|nutrition|protein|carbs?|fat|breakfast|lunch|dinner|snack|calories?|kcal)\b").unwrap()),
    ];
}

pub const OFF_TOPIC_REPLY: &str = "I can only help with BMI, BMR, TDEE, nutrition, workouts, weight goals \
                                   and how to use these features.";

pub fn classify(message: &str) -> Option<Topic> {
    TOPICS
        .iter()
        .find(|(_, re)| re.is_match(message))
        .map(|(topic, _)| *topic)
}

/// What the assistant knows about the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserContext {
    /// Absent or all-zero when the profile is incomplete.
    pub metrics: Option<BodyMetrics>,
    pub active_goal: Option<(GoalType, f64)>,
    pub daily_target_in: Option<f64>,
}

impl UserContext {
    fn metrics(&self) -> Option<BodyMetrics> {
        self.metrics.filter(|m| m.bmi > 0.0 || m.tdee > 0.0)
    }
}

fn bmi_reply(ctx: &UserContext) -> String {
    let mut out = String::from(
        "BMI is weight in kg divided by height in metres squared. Below 18.5 is underweight, \
         18.5 to 25 normal, 25 to 30 overweight and 30 or more obese.",
    );
    if let Some(m) = ctx.metrics() {
        if let Some(class) = BmiClass::classify(m.bmi) {
            out.push_str(&format!(" Your BMI is {:.2}, which is {}.", m.bmi, class.label()));
        }
    }
    out
}

fn bmr_reply(ctx: &UserContext) -> String {
    let mut out = String::from(
        "BMR is the energy your body uses at rest. It is estimated with the Mifflin-St Jeor formula \
         from weight, height, age and sex.",
    );
    if let Some(m) = ctx.metrics().filter(|m| m.bmr > 0.0) {
        out.push_str(&format!(" Your BMR is about {:.0} kcal per day.", m.bmr));
    }
    out
}

fn tdee_reply(ctx: &UserContext) -> String {
    let mut out = String::from(
        "TDEE is your BMR multiplied by an activity factor between 1.2 (sedentary) and 1.9 (very active). \
         Eating around it keeps your weight stable.",
    );
    if let Some(m) = ctx.metrics().filter(|m| m.tdee > 0.0) {
        out.push_str(&format!(" Your TDEE is about {:.0} kcal per day.", m.tdee));
    }
    out
}

fn nutrition_reply(ctx: &UserContext) -> String {
    let mut out = String::from(
        "Log each meal with its food and grams; calories are computed from the food's kcal per 100 g. \
         Aim for balanced plates with protein, vegetables and whole grains.",
    );
    if let Some(target) = ctx.daily_target_in.filter(|t| *t > 0.0) {
        out.push_str(&format!(" Your goal suggests about {target:.0} kcal of intake per day."));
    } else if let Some(m) = ctx.metrics().filter(|m| m.tdee > 0.0) {
        out.push_str(&format!(" Staying near {:.0} kcal per day maintains your weight.", m.tdee));
    }
    out
}

fn workout_reply(_ctx: &UserContext) -> String {
    "Workouts are estimated with MET values (run 9.8, bike 7.5, gym 6.0, walk 3.5, yoga 3.0) times your \
     weight and duration, plus a capped bonus for distance and steps. Try for at least 150 minutes of \
     moderate activity a week."
        .into()
}

fn goal_reply(ctx: &UserContext) -> String {
    let mut out = String::from(
        "A goal sets a target weight and an optional deadline. One kilogram is about 7700 kcal, and \
         progress counts the calories burned in workouts since the goal started. Only one goal can be \
         in progress at a time.",
    );
    if let Some((goal_type, target)) = ctx.active_goal {
        out.push_str(&format!(" Your current goal: {} to {target} kg.", goal_type.label()));
    }
    out
}

/// Answer to `message`; `None` topic means the question was refused.
pub fn respond(message: &str, ctx: &UserContext) -> (Option<Topic>, String) {
    let topic = classify(message);
    let reply = match topic {
        Some(Topic::Medical) => "I can't diagnose conditions or recommend medication. Please talk to a doctor \
                                 about any serious health concern."
            .to_string(),
        Some(Topic::Bmi) => bmi_reply(ctx),
        Some(Topic::Bmr) => bmr_reply(ctx),
        Some(Topic::Tdee) => tdee_reply(ctx),
        Some(Topic::Nutrition) => nutrition_reply(ctx),
        Some(Topic::Workout) => workout_reply(ctx),
        Some(Topic::Goal) => goal_reply(ctx),
        None => OFF_TOPIC_REPLY.to_string(),
    };
    (topic, reply)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> UserContext {
        UserContext {
            metrics: Some(BodyMetrics {
                bmi: 24.22,
                bmr: 1643.0,
                tdee: 2259.0,
            }),
            active_goal: Some((GoalType::LoseWeight, 75.0)),
            daily_target_in: Some(1800.0),
        }
    }

    #[test]
    fn classifies_topics() {
        assert_eq!(classify("What is my BMI?"), Some(Topic::Bmi));
        assert_eq!(classify("how is tdee computed"), Some(Topic::Tdee));
        assert_eq!(classify("What should I eat for breakfast"), Some(Topic::Nutrition));
        assert_eq!(classify("Is running better than cycling"), Some(Topic::Workout));
        assert_eq!(classify("can I change my goal deadline"), Some(Topic::Goal));
        assert_eq!(classify("which pills help with BMI"), Some(Topic::Medical));
    }

    #[test]
    fn refuses_unrelated_questions() {
        let (topic, reply) = respond("Write me a sorting algorithm", &ctx());
        assert_eq!(topic, None);
        assert_eq!(reply, OFF_TOPIC_REPLY);
        assert_eq!(classify("who won the election"), None);
    }

    #[test]
    fn personalises_with_metrics() {
        let (_, reply) = respond("what's my bmi", &ctx());
        assert!(reply.contains("24.22"));
        assert!(reply.contains("normal"));

        let (_, reply) = respond("what's my TDEE", &ctx());
        assert!(reply.contains("2259"));

        let (_, reply) = respond("how much food", &ctx());
        assert!(reply.contains("1800"));

        let (_, reply) = respond("my goal?", &ctx());
        assert!(reply.contains("Lose weight to 75 kg"));
    }

    #[test]
    fn generic_answers_without_profile() {
        let (topic, reply) = respond("explain BMR", &UserContext::default());
        assert_eq!(topic, Some(Topic::Bmr));
        assert!(!reply.contains("Your BMR"));
    }
}
