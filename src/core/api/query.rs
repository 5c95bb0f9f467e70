use chrono::NaiveDate;
use serde::Deserialize;

use crate::core::models::reservation::Reservation;
use crate::core::models::status::ReservationStatus;

/// Filters for the reservation list endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReservationQuery {
    pub status: Option<ReservationStatus>,
    pub parking_lot_id: Option<String>,
    pub user_id: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    /// Zero-based
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl ReservationQuery {
    /// Query-string pairs for the fields that are set.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = self.status {
            pairs.push(("status", status.id().to_string()));
        }
        if let Some(lot) = &self.parking_lot_id {
            pairs.push(("parkingLotId", lot.clone()));
        }
        if let Some(user) = &self.user_id {
            pairs.push(("userId", user.clone()));
        }
        if let Some(from) = self.from {
            pairs.push(("from", from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = self.to {
            pairs.push(("to", to.format("%Y-%m-%d").to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(size) = self.size {
            pairs.push(("size", size.to_string()));
        }
        pairs
    }
}

/// One page of reservations.
#[derive(Debug, Clone, Default)]
pub struct ReservationPage {
    pub items: Vec<Reservation>,
    pub total: Option<u64>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

/// Backends answer either with a page object or a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum ListPayload<T> {
    Page(PagePayload<T>),
    Items(Vec<T>),
}

#[derive(Deserialize)]
pub(crate) struct PagePayload<T> {
    #[serde(alias = "content")]
    items: Vec<T>,
    #[serde(default, alias = "totalElements", alias = "total_elements")]
    total: Option<u64>,
    #[serde(default, alias = "number")]
    page: Option<u32>,
    #[serde(default)]
    size: Option<u32>,
}

impl From<ListPayload<Reservation>> for ReservationPage {
    fn from(payload: ListPayload<Reservation>) -> Self {
        match payload {
            ListPayload::Page(p) => Self {
                items: p.items,
                total: p.total,
                page: p.page,
                size: p.size,
            },
            ListPayload::Items(items) => Self {
                total: Some(items.len() as u64),
                items,
                page: None,
                size: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_has_no_pairs() {
        assert!(ReservationQuery::default().to_pairs().is_empty());
    }

    #[test]
    fn set_fields_become_pairs_in_order() {
        let query = ReservationQuery {
            status: Some(ReservationStatus::CheckedIn),
            parking_lot_id: Some("3".to_string()),
            from: NaiveDate::from_ymd_opt(2024, 1, 1),
            page: Some(0),
            size: Some(20),
            ..ReservationQuery::default()
        };
        assert_eq!(
            query.to_pairs(),
            vec![
                ("status", "checked_in".to_string()),
                ("parkingLotId", "3".to_string()),
                ("from", "2024-01-01".to_string()),
                ("page", "0".to_string()),
                ("size", "20".to_string()),
            ]
        );
    }

    const ITEM: &str = r#"{
        "id": 1, "status": "confirmed",
        "startTime": "2024-01-01T08:00:00Z", "endTime": "2024-01-01T09:00:00Z"
    }"#;

    #[test]
    fn decode_spring_style_page() {
        let json = format!(
            r#"{{ "content": [{}], "totalElements": 41, "number": 2, "size": 20 }}"#,
            ITEM
        );
        let payload: ListPayload<Reservation> = serde_json::from_str(&json).unwrap();
        let page = ReservationPage::from(payload);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total, Some(41));
        assert_eq!(page.page, Some(2));
        assert_eq!(page.size, Some(20));
    }

    #[test]
    fn decode_items_page_with_total() {
        let json = format!(r#"{{ "items": [{}, {}], "total": 2 }}"#, ITEM, ITEM);
        let payload: ListPayload<Reservation> = serde_json::from_str(&json).unwrap();
        let page = ReservationPage::from(payload);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, Some(2));
        assert!(page.page.is_none());
    }

    #[test]
    fn decode_bare_array() {
        let json = format!("[{}]", ITEM);
        let payload: ListPayload<Reservation> = serde_json::from_str(&json).unwrap();
        let page = ReservationPage::from(payload);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total, Some(1));
    }
}
