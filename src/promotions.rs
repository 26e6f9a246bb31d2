//! Promotion visibility rules.

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::promotion;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PromotionStatus {
    Staging,
    Published,
    Expired,
}

impl PromotionStatus {
    /// Unrecognized values are treated as unpublished.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "published" => Self::Published,
            "expired" => Self::Expired,
            _ => Self::Staging,
        }
    }
}

/// Stored status adjusted for the date: a published promotion whose end date
/// has passed is expired.
pub fn effective_status(promotion: &promotion::Model, today: NaiveDate) -> PromotionStatus {
    match PromotionStatus::parse(&promotion.status) {
        PromotionStatus::Published if promotion.ends_on < today => PromotionStatus::Expired,
        status => status,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct VisiblePromotion {
    #[serde(flatten)]
    pub promotion: promotion::Model,
    /// Starts after today
    pub upcoming: bool,
}

/// Published, unexpired promotions ordered by start date.
pub fn visible_promotions(promotions: &[promotion::Model], today: NaiveDate) -> Vec<VisiblePromotion> {
    let mut visible: Vec<VisiblePromotion> = promotions
        .iter()
        .filter(|p| effective_status(p, today) == PromotionStatus::Published)
        .map(|p| VisiblePromotion {
            promotion: p.clone(),
            upcoming: p.starts_on > today,
        })
        .collect();
    visible.sort_by(|a, b| {
        a.promotion
            .starts_on
            .cmp(&b.promotion.starts_on)
            .then_with(|| a.promotion.id.cmp(&b.promotion.id))
    });
    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeds;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn published_past_end_is_expired() {
        let promotions = seeds::promotions();
        let beauty_week = promotions.iter().find(|p| p.id == 4).unwrap();

        assert_eq!(
            effective_status(beauty_week, day(2026, 3, 14)),
            PromotionStatus::Published
        );
        assert_eq!(
            effective_status(beauty_week, day(2026, 3, 15)),
            PromotionStatus::Expired
        );
    }

    #[test]
    fn staging_stays_staging() {
        let promotions = seeds::promotions();
        let market = promotions.iter().find(|p| p.id == 5).unwrap();
        assert_eq!(
            effective_status(market, day(2026, 12, 10)),
            PromotionStatus::Staging
        );
    }

    #[test]
    fn visible_list_is_ordered_and_flags_upcoming() {
        let visible = visible_promotions(&seeds::promotions(), day(2026, 10, 19));

        let ids: Vec<i32> = visible.iter().map(|v| v.promotion.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(
            visible.iter().map(|v| v.upcoming).collect::<Vec<_>>(),
            vec![false, false, true]
        );
    }

    #[test]
    fn unknown_status_is_hidden() {
        let mut promotion = seeds::promotions().remove(0);
        promotion.status = "archived".to_string();
        assert!(visible_promotions(&[promotion], day(2026, 6, 1)).is_empty());
    }
}
