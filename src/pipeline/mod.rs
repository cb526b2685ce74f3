//! # Pipeline Builder
//!
//! 집계 파이프라인을 선언적인 스테이지 값의 순서열로 구성하는 모듈입니다.
//! 스테이지 생성은 부수효과가 없는 순수한 데이터 구성이며,
//! 잘못된 파라미터(음수 limit 등)는 `AppError::InvalidArgument`로 즉시 거부합니다.
//!
//! ## 모듈 구성
//!
//! - [`stage`] - 개별 스테이지 디스크립터와 BSON 렌더링
//! - [`operations`] - 엔드포인트별 논리 연산 → 파이프라인 카탈로그
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::pipeline::{Pipeline, SortOrder};
//!
//! let pipeline = Pipeline::new()
//!     .matching(doc! { "address.country": "Korea" })
//!     .sort("age", SortOrder::Descending)
//!     .limit(10)?;
//!
//! let documents = pipeline.to_documents();
//! ```

pub mod stage;
pub mod operations;

pub use stage::{Bucket, GraphLookup, Lookup, Merge, SortOrder, Stage};
pub use operations::AggregationOperation;

use mongodb::bson::{Bson, Document};
use crate::core::errors::{AppError, AppResult};

/// 순서가 있는 스테이지 목록
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

fn require_non_empty(value: &str, what: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidArgument(format!("{} must not be empty", what)));
    }
    Ok(())
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    fn stage(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    /// `$match`
    pub fn matching(self, filter: Document) -> Self {
        self.stage(Stage::Match(filter))
    }

    /// `$group` - `id`는 그룹 키 표현식(예: `"$address.country"`)
    pub fn group(self, id: impl Into<Bson>, accumulators: Document) -> Self {
        self.stage(Stage::Group { id: id.into(), accumulators })
    }

    /// `$project`
    pub fn project(self, spec: Document) -> Self {
        self.stage(Stage::Project(spec))
    }

    /// `$sort` - 단일 키
    pub fn sort(self, field: &str, order: SortOrder) -> Self {
        self.stage(Stage::Sort(vec![(field.to_string(), order)]))
    }

    /// `$limit` - `n`은 1 이상이어야 합니다.
    pub fn limit(self, n: i64) -> AppResult<Self> {
        if n < 1 {
            return Err(AppError::InvalidArgument(format!("limit must be positive, got {}", n)));
        }
        Ok(self.stage(Stage::Limit(n)))
    }

    /// `$skip` - `n`은 0 이상이어야 합니다.
    pub fn skip(self, n: i64) -> AppResult<Self> {
        if n < 0 {
            return Err(AppError::InvalidArgument(format!("skip must not be negative, got {}", n)));
        }
        Ok(self.stage(Stage::Skip(n)))
    }

    /// `$unwind` - 배열이 비었거나 없는 문서는 버립니다.
    pub fn unwind(self, path: &str) -> AppResult<Self> {
        require_non_empty(path, "unwind path")?;
        Ok(self.stage(Stage::Unwind(path.to_string())))
    }

    /// `$lookup`
    pub fn lookup(self, lookup: Lookup) -> AppResult<Self> {
        require_non_empty(&lookup.from, "lookup.from")?;
        require_non_empty(&lookup.as_field, "lookup.as")?;
        Ok(self.stage(Stage::Lookup(lookup)))
    }

    /// `$addFields`
    pub fn add_fields(self, fields: Document) -> Self {
        self.stage(Stage::AddFields(fields))
    }

    /// `$count` - 결과 필드 이름
    pub fn count(self, field: &str) -> AppResult<Self> {
        require_non_empty(field, "count field")?;
        if field.starts_with('$') || field.contains('.') {
            return Err(AppError::InvalidArgument(format!(
                "count field must not start with '$' or contain '.', got {}",
                field
            )));
        }
        Ok(self.stage(Stage::Count(field.to_string())))
    }

    /// `$facet` - 이름이 붙은 하위 파이프라인 목록
    pub fn facet(self, facets: Vec<(String, Pipeline)>) -> AppResult<Self> {
        if facets.is_empty() {
            return Err(AppError::InvalidArgument("facet requires at least one sub-pipeline".to_string()));
        }
        Ok(self.stage(Stage::Facet(facets)))
    }

    /// `$bucket` - 경계값은 2개 이상, 엄격한 오름차순이어야 합니다.
    pub fn bucket(self, bucket: Bucket) -> AppResult<Self> {
        require_non_empty(&bucket.group_by, "bucket groupBy")?;
        if bucket.boundaries.len() < 2 {
            return Err(AppError::InvalidArgument(
                "bucket requires at least two boundaries".to_string(),
            ));
        }
        let numeric: Option<Vec<f64>> = bucket.boundaries.iter().map(bson_as_f64).collect();
        if let Some(values) = numeric {
            if values.windows(2).any(|pair| pair[0] >= pair[1]) {
                return Err(AppError::InvalidArgument(
                    "bucket boundaries must be strictly ascending".to_string(),
                ));
            }
        }
        Ok(self.stage(Stage::Bucket(bucket)))
    }

    /// `$sortByCount`
    pub fn sort_by_count(self, path: &str) -> AppResult<Self> {
        require_non_empty(path, "sortByCount expression")?;
        Ok(self.stage(Stage::SortByCount(path.to_string())))
    }

    /// `$graphLookup`
    pub fn graph_lookup(self, graph: GraphLookup) -> AppResult<Self> {
        require_non_empty(&graph.from, "graphLookup.from")?;
        require_non_empty(&graph.start_with, "graphLookup.startWith")?;
        require_non_empty(&graph.connect_from_field, "graphLookup.connectFromField")?;
        require_non_empty(&graph.connect_to_field, "graphLookup.connectToField")?;
        require_non_empty(&graph.as_field, "graphLookup.as")?;
        Ok(self.stage(Stage::GraphLookup(graph)))
    }

    /// `$replaceRoot` - 새 루트가 될 내장 문서 경로
    pub fn replace_root(self, path: &str) -> AppResult<Self> {
        require_non_empty(path, "replaceRoot newRoot")?;
        Ok(self.stage(Stage::ReplaceRoot(path.to_string())))
    }

    /// `$merge` - 반드시 마지막 스테이지여야 합니다.
    pub fn merge(self, merge: Merge) -> AppResult<Self> {
        require_non_empty(&merge.into, "merge.into")?;
        require_non_empty(&merge.on, "merge.on")?;
        Ok(self.stage(Stage::Merge(merge)))
    }

    /// `$out` - 반드시 마지막 스테이지여야 합니다.
    pub fn out(self, collection: &str) -> AppResult<Self> {
        require_non_empty(collection, "out collection")?;
        Ok(self.stage(Stage::Out(collection.to_string())))
    }

    /// `$sample` - `size`는 1 이상이어야 합니다.
    pub fn sample(self, size: i64) -> AppResult<Self> {
        if size < 1 {
            return Err(AppError::InvalidArgument(format!("sample size must be positive, got {}", size)));
        }
        Ok(self.stage(Stage::Sample(size)))
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// 마지막 스테이지가 `$out` / `$merge`인지 여부
    pub fn writes_output(&self) -> bool {
        self.stages.last().is_some_and(Stage::is_write_stage)
    }

    /// 로그용 요약 (`$match → $count`)
    pub fn describe(&self) -> String {
        self.stages
            .iter()
            .map(Stage::operator)
            .collect::<Vec<_>>()
            .join(" → ")
    }

    /// 서버에 보내기 전 구조를 검증합니다.
    ///
    /// - 최소 한 개의 스테이지
    /// - `$out` / `$merge`는 마지막 위치에만
    /// - `$facet` 하위 파이프라인에는 `$out`, `$merge`, `$facet` 금지
    ///
    /// 위반 시 `AppError::ValidationError`를 반환합니다.
    pub fn validate(&self) -> AppResult<()> {
        if self.stages.is_empty() {
            return Err(AppError::ValidationError("pipeline has no stages".to_string()));
        }

        let last = self.stages.len() - 1;
        for (index, stage) in self.stages.iter().enumerate() {
            if stage.is_write_stage() && index != last {
                return Err(AppError::ValidationError(format!(
                    "{} must be the last stage (found at position {} of {})",
                    stage.operator(),
                    index + 1,
                    self.stages.len()
                )));
            }

            if let Stage::Facet(facets) = stage {
                for (name, sub_pipeline) in facets {
                    if sub_pipeline.is_empty() {
                        return Err(AppError::ValidationError(format!(
                            "facet '{}' has no stages",
                            name
                        )));
                    }
                    if let Some(forbidden) = sub_pipeline
                        .stages
                        .iter()
                        .find(|s| s.is_write_stage() || matches!(s, Stage::Facet(_)))
                    {
                        return Err(AppError::ValidationError(format!(
                            "{} is not allowed inside facet '{}'",
                            forbidden.operator(),
                            name
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// 드라이버에 넘길 문서 목록으로 렌더링합니다.
    pub fn to_documents(&self) -> Vec<Document> {
        self.stages.iter().map(Stage::to_document).collect()
    }
}

fn bson_as_f64(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(v) => Some(f64::from(*v)),
        Bson::Int64(v) => Some(*v as f64),
        Bson::Double(v) => Some(*v),
        _ => None,
    }
}
