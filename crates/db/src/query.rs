//! Filter and sort composition for the moments listing.
//!
//! Keyset pagination over the composite `(date, _id)` key: the cursor
//! filter uses strict comparisons only, so a row equal to the cursor is
//! never re-delivered, and the id tie-break keeps rows sharing a `date`
//! stable across pages.

use bson::{DateTime as BsonDateTime, Document, doc};
use keepsake_core::cursor::{Cursor, SortOrder};
use keepsake_core::error::CoreError;
use keepsake_core::types::Timestamp;

use crate::models::moment::Visibility;

/// Conjunction of the optional date-range and visibility conditions.
/// Absent parameters are omitted, not defaulted.
pub fn build_base_filter(
    from_date: Option<Timestamp>,
    to_date: Option<Timestamp>,
    visibility: Option<Visibility>,
) -> Document {
    let mut filter = Document::new();

    if from_date.is_some() || to_date.is_some() {
        let mut range = Document::new();
        if let Some(from) = from_date {
            range.insert("$gte", BsonDateTime::from_chrono(from));
        }
        if let Some(to) = to_date {
            range.insert("$lte", BsonDateTime::from_chrono(to));
        }
        filter.insert("date", range);
    }

    if let Some(visibility) = visibility {
        filter.insert("visibility", visibility.as_str());
    }

    filter
}

/// Strict-after (asc) / strict-before (desc) filter on the composite
/// key: `(date OP cursor.date) OR (date == cursor.date AND _id OP
/// cursor.id)`.
///
/// A cursor whose embedded order differs from the request's is
/// rejected; direction is never inferred from the cursor.
pub fn build_cursor_filter(cursor: &Cursor, order: SortOrder) -> Result<Document, CoreError> {
    if cursor.order != order {
        return Err(CoreError::CursorOrderMismatch);
    }

    let operator = match order {
        SortOrder::Asc => "$gt",
        SortOrder::Desc => "$lt",
    };

    let date = BsonDateTime::from_chrono(cursor.date);
    let mut date_beyond = Document::new();
    date_beyond.insert(operator, date);
    let mut id_beyond = Document::new();
    id_beyond.insert(operator, cursor.id);

    Ok(doc! {
        "$or": [
            { "date": date_beyond },
            { "date": date, "_id": id_beyond },
        ]
    })
}

/// Conjoin the base and cursor filters. An empty base filter matches
/// everything, so the cursor filter stands alone.
pub fn merge_filters(base: Document, cursor: Option<Document>) -> Document {
    match cursor {
        None => base,
        Some(cursor_filter) if base.is_empty() => cursor_filter,
        Some(cursor_filter) => doc! { "$and": [base, cursor_filter] },
    }
}

/// Sort specification: both key parts in the request's direction, which
/// the cursor filter's semantics rely on.
pub fn sort_document(order: SortOrder) -> Document {
    let direction = match order {
        SortOrder::Asc => 1,
        SortOrder::Desc => -1,
    };
    doc! { "date": direction, "_id": direction }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use keepsake_core::types::MomentId;

    use super::*;

    fn ts(day: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2026, 2, day, 12, 0, 0).unwrap()
    }

    fn sample_cursor(order: SortOrder) -> Cursor {
        Cursor {
            date: ts(10),
            id: MomentId::parse_str("65a1b2c3d4e5f60718293a4b").unwrap(),
            order,
        }
    }

    #[test]
    fn base_filter_empty_without_parameters() {
        assert_eq!(build_base_filter(None, None, None), Document::new());
    }

    #[test]
    fn base_filter_combines_range_and_visibility() {
        let filter = build_base_filter(Some(ts(1)), Some(ts(28)), Some(Visibility::Public));
        assert_eq!(
            filter,
            doc! {
                "date": {
                    "$gte": BsonDateTime::from_chrono(ts(1)),
                    "$lte": BsonDateTime::from_chrono(ts(28)),
                },
                "visibility": "public",
            }
        );
    }

    #[test]
    fn base_filter_with_only_lower_bound() {
        let filter = build_base_filter(Some(ts(1)), None, None);
        assert_eq!(
            filter,
            doc! { "date": { "$gte": BsonDateTime::from_chrono(ts(1)) } }
        );
    }

    #[test]
    fn cursor_filter_uses_strict_comparisons() {
        let cursor = sample_cursor(SortOrder::Desc);
        let filter = build_cursor_filter(&cursor, SortOrder::Desc).unwrap();
        let date = BsonDateTime::from_chrono(cursor.date);
        assert_eq!(
            filter,
            doc! {
                "$or": [
                    { "date": { "$lt": date } },
                    { "date": date, "_id": { "$lt": cursor.id } },
                ]
            }
        );
    }

    #[test]
    fn ascending_cursor_uses_gt() {
        let cursor = sample_cursor(SortOrder::Asc);
        let filter = build_cursor_filter(&cursor, SortOrder::Asc).unwrap();
        let date = BsonDateTime::from_chrono(cursor.date);
        assert_eq!(
            filter,
            doc! {
                "$or": [
                    { "date": { "$gt": date } },
                    { "date": date, "_id": { "$gt": cursor.id } },
                ]
            }
        );
    }

    #[test]
    fn cursor_order_mismatch_is_rejected() {
        let cursor = sample_cursor(SortOrder::Asc);
        assert_eq!(
            build_cursor_filter(&cursor, SortOrder::Desc),
            Err(CoreError::CursorOrderMismatch)
        );
    }

    #[test]
    fn merge_keeps_lone_filters() {
        let base = doc! { "visibility": "public" };
        assert_eq!(merge_filters(base.clone(), None), base);

        let cursor = doc! { "$or": [] };
        assert_eq!(
            merge_filters(Document::new(), Some(cursor.clone())),
            cursor
        );
    }

    #[test]
    fn merge_conjoins_both_filters() {
        let base = doc! { "visibility": "public" };
        let cursor = doc! { "$or": [] };
        assert_eq!(
            merge_filters(base.clone(), Some(cursor.clone())),
            doc! { "$and": [base, cursor] }
        );
    }

    #[test]
    fn sort_directions_follow_order() {
        assert_eq!(
            sort_document(SortOrder::Asc),
            doc! { "date": 1, "_id": 1 }
        );
        assert_eq!(
            sort_document(SortOrder::Desc),
            doc! { "date": -1, "_id": -1 }
        );
    }
}
