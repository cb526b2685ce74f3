//! 엔드포인트별 논리 연산 카탈로그
//!
//! 각 `AggregationOperation` 값은 정확히 하나의 파이프라인을 만듭니다.
//! 컬렉션 이름과 조인 필드는 [`CollectionConfig`]에서 가져옵니다.

use mongodb::bson::{Bson, Document, doc};

use crate::config::CollectionConfig;
use crate::core::errors::AppResult;
use super::{Bucket, GraphLookup, Lookup, Merge, Pipeline, SortOrder};

/// 연령 버킷 경계값 `[25, 30, 35, 40, 45)`
pub const AGE_BUCKET_BOUNDARIES: [i32; 5] = [25, 30, 35, 40, 45];

/// 잔액 상태 `High` 기준값
pub const HIGH_BALANCE_THRESHOLD: f64 = 1000.0;

/// 시니어 기준 나이 (초과)
pub const SENIOR_AGE_THRESHOLD: i32 = 30;

#[derive(Debug, Clone, PartialEq)]
pub enum AggregationOperation {
    MatchByAge(i32),
    GroupByCountry,
    Projection,
    SortByAge,
    Limit(i64),
    Skip(i64),
    UnwindTags,
    ProjectSortUnwind,
    WithOrders,
    BalanceStatus,
    CountByCountry(String),
    Facet,
    BucketByAge,
    TagsByCount,
    Hierarchy,
    ReplaceRootAddress,
    MergeCountrySummary,
    OutSeniorUsers,
    Sample(i64),
}

impl AggregationOperation {
    /// 로그 및 응답에 사용하는 연산 이름
    pub fn name(&self) -> &'static str {
        match self {
            Self::MatchByAge(_) => "match_by_age",
            Self::GroupByCountry => "group_by_country",
            Self::Projection => "projection",
            Self::SortByAge => "sort_by_age",
            Self::Limit(_) => "limit",
            Self::Skip(_) => "skip",
            Self::UnwindTags => "unwind_tags",
            Self::ProjectSortUnwind => "project_sort_unwind",
            Self::WithOrders => "with_orders",
            Self::BalanceStatus => "balance_status",
            Self::CountByCountry(_) => "count_by_country",
            Self::Facet => "facet",
            Self::BucketByAge => "bucket_by_age",
            Self::TagsByCount => "tags_by_count",
            Self::Hierarchy => "hierarchy",
            Self::ReplaceRootAddress => "replace_root_address",
            Self::MergeCountrySummary => "merge_country_summary",
            Self::OutSeniorUsers => "out_senior_users",
            Self::Sample(_) => "sample",
        }
    }

    /// 연산에 해당하는 파이프라인을 만듭니다.
    ///
    /// 파라미터가 잘못되면 DB 호출 전에 `AppError::InvalidArgument`로 실패합니다.
    pub fn build(&self, collections: &CollectionConfig) -> AppResult<Pipeline> {
        let pipeline = Pipeline::new();

        match self {
            Self::MatchByAge(age) => Ok(pipeline.matching(doc! { "age": *age })),

            Self::GroupByCountry => Ok(pipeline
                .group(
                    "$address.country",
                    doc! {
                        "avgBalance": { "$avg": "$balance" },
                        "count": { "$sum": 1 },
                    },
                )
                .project(doc! {
                    "_id": 0,
                    "id": "$_id",
                    "avgBalance": 1,
                    "count": 1,
                })),

            Self::Projection => Ok(pipeline.project(doc! {
                "fullName": { "$toUpper": "$name" },
                "email": "$email",
                "_id": 0,
            })),

            Self::SortByAge => Ok(pipeline.sort("age", SortOrder::Descending)),

            Self::Limit(n) => pipeline.limit(*n),

            Self::Skip(n) => pipeline.skip(*n),

            Self::UnwindTags => pipeline.unwind("tags"),

            Self::ProjectSortUnwind => pipeline
                .project(doc! {
                    "fullName": { "$toUpper": "$name" },
                    "email": "$email",
                    "tags": "$tags",
                    "age": 1,
                    "_id": 0,
                })
                .sort("age", SortOrder::Descending)
                .unwind("tags"),

            Self::WithOrders => pipeline.lookup(Lookup {
                from: collections.orders.clone(),
                local_field: "email".to_string(),
                foreign_field: collections.order_user_email_field.clone(),
                as_field: "orders".to_string(),
            }),

            Self::BalanceStatus => Ok(pipeline.add_fields(doc! {
                "balanceStatus": {
                    "$cond": {
                        "if": { "$gte": ["$balance", HIGH_BALANCE_THRESHOLD] },
                        "then": "High",
                        "else": "Low",
                    }
                }
            })),

            Self::CountByCountry(country) => pipeline
                .matching(doc! { "address.country": country.as_str() })
                .count("count"),

            Self::Facet => {
                let age_groups = Pipeline::new().bucket(age_bucket())?;
                let active_users = Pipeline::new()
                    .matching(doc! { "tags": { "$in": ["admin"] } })
                    .count("count")?;

                pipeline.facet(vec![
                    ("ageGroups".to_string(), age_groups),
                    ("activeUsers".to_string(), active_users),
                ])
            }

            Self::BucketByAge => pipeline.bucket(age_bucket()),

            Self::TagsByCount => pipeline.unwind("tags")?.sort_by_count("tags"),

            Self::Hierarchy => pipeline.graph_lookup(GraphLookup {
                from: collections.users.clone(),
                start_with: "managerId".to_string(),
                connect_from_field: "managerId".to_string(),
                connect_to_field: "_id".to_string(),
                as_field: "reportingHierarchy".to_string(),
            }),

            Self::ReplaceRootAddress => pipeline.replace_root("address"),

            Self::MergeCountrySummary => pipeline
                .group("$address.country", doc! { "total": { "$sum": 1 } })
                .merge(Merge {
                    into: collections.country_summary.clone(),
                    on: "_id".to_string(),
                }),

            Self::OutSeniorUsers => pipeline
                .matching(doc! { "age": { "$gt": SENIOR_AGE_THRESHOLD } })
                .out(&collections.senior_users),

            Self::Sample(size) => pipeline.sample(*size),
        }
    }
}

fn age_bucket() -> Bucket {
    Bucket {
        group_by: "age".to_string(),
        boundaries: AGE_BUCKET_BOUNDARIES.iter().map(|b| Bson::Int32(*b)).collect(),
        default_bucket: Some(Bson::String("Other".to_string())),
        output: count_output(),
    }
}

fn count_output() -> Document {
    doc! { "count": { "$sum": 1 } }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::AppError;

    fn build(op: AggregationOperation) -> Vec<Document> {
        op.build(&CollectionConfig::default()).unwrap().to_documents()
    }

    #[test]
    fn test_match_by_age() {
        assert_eq!(build(AggregationOperation::MatchByAge(30)), vec![doc! { "$match": { "age": 30 } }]);
        assert_eq!(build(AggregationOperation::MatchByAge(-3)), vec![doc! { "$match": { "age": -3 } }]);
    }

    #[test]
    fn test_group_by_country_projects_id() {
        let stages = build(AggregationOperation::GroupByCountry);

        assert_eq!(stages.len(), 2);
        assert_eq!(
            stages[0],
            doc! {
                "$group": {
                    "_id": "$address.country",
                    "avgBalance": { "$avg": "$balance" },
                    "count": { "$sum": 1 },
                }
            }
        );
        assert_eq!(stages[1].get_document("$project").unwrap().get_str("id").unwrap(), "$_id");
    }

    #[test]
    fn test_project_sort_unwind_keeps_sort_key() {
        let stages = build(AggregationOperation::ProjectSortUnwind);
        let project = stages[0].get_document("$project").unwrap();

        assert!(project.contains_key("age"));
        assert_eq!(stages[1], doc! { "$sort": { "age": -1 } });
        assert_eq!(stages[2], doc! { "$unwind": "$tags" });
    }

    #[test]
    fn test_with_orders_uses_configured_foreign_field() {
        let collections = CollectionConfig {
            order_user_email_field: "userEmail".to_string(),
            ..CollectionConfig::default()
        };
        let stages = AggregationOperation::WithOrders.build(&collections).unwrap().to_documents();

        assert_eq!(
            stages,
            vec![doc! {
                "$lookup": {
                    "from": "orders",
                    "localField": "email",
                    "foreignField": "userEmail",
                    "as": "orders",
                }
            }]
        );
    }

    #[test]
    fn test_count_by_country() {
        assert_eq!(
            build(AggregationOperation::CountByCountry("Korea".to_string())),
            vec![
                doc! { "$match": { "address.country": "Korea" } },
                doc! { "$count": "count" },
            ]
        );
    }

    #[test]
    fn test_facet_has_two_branches() {
        let stages = build(AggregationOperation::Facet);
        let facet = stages[0].get_document("$facet").unwrap();

        assert_eq!(facet.get_array("ageGroups").unwrap().len(), 1);
        assert_eq!(facet.get_array("activeUsers").unwrap().len(), 2);
    }

    #[test]
    fn test_hierarchy_graph_lookup() {
        let stages = build(AggregationOperation::Hierarchy);
        let graph = stages[0].get_document("$graphLookup").unwrap();

        assert_eq!(graph.get_str("startWith").unwrap(), "$managerId");
        assert_eq!(graph.get_str("connectToField").unwrap(), "_id");
        assert_eq!(graph.get_str("as").unwrap(), "reportingHierarchy");
    }

    #[test]
    fn test_write_operations_end_with_write_stage() {
        let merge = AggregationOperation::MergeCountrySummary
            .build(&CollectionConfig::default())
            .unwrap();
        let out = AggregationOperation::OutSeniorUsers
            .build(&CollectionConfig::default())
            .unwrap();

        assert!(merge.writes_output());
        assert!(out.writes_output());
        assert_eq!(out.to_documents()[1], doc! { "$out": "senior_users" });
    }

    #[test]
    fn test_invalid_parameters_fail_before_execution() {
        let collections = CollectionConfig::default();

        assert!(matches!(
            AggregationOperation::Limit(-1).build(&collections),
            Err(AppError::InvalidArgument(_))
        ));
        assert!(matches!(
            AggregationOperation::Skip(-1).build(&collections),
            Err(AppError::InvalidArgument(_))
        ));
        assert!(matches!(
            AggregationOperation::Sample(0).build(&collections),
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_every_catalog_pipeline_is_structurally_valid() {
        let collections = CollectionConfig::default();
        let operations = [
            AggregationOperation::MatchByAge(25),
            AggregationOperation::GroupByCountry,
            AggregationOperation::Projection,
            AggregationOperation::SortByAge,
            AggregationOperation::Limit(3),
            AggregationOperation::Skip(0),
            AggregationOperation::UnwindTags,
            AggregationOperation::ProjectSortUnwind,
            AggregationOperation::WithOrders,
            AggregationOperation::BalanceStatus,
            AggregationOperation::CountByCountry("Japan".to_string()),
            AggregationOperation::Facet,
            AggregationOperation::BucketByAge,
            AggregationOperation::TagsByCount,
            AggregationOperation::Hierarchy,
            AggregationOperation::ReplaceRootAddress,
            AggregationOperation::MergeCountrySummary,
            AggregationOperation::OutSeniorUsers,
            AggregationOperation::Sample(2),
        ];

        for op in operations {
            let pipeline = op.build(&collections).unwrap();
            assert!(pipeline.validate().is_ok(), "{} should validate", op.name());
        }
    }
}
