//! 파이프라인 스테이지 디스크립터
//!
//! 각 스테이지는 순수한 데이터 값이며 [`Stage::to_document`]로
//! 드라이버에 넘길 BSON 문서(`{"$match": {...}}` 등)로 렌더링됩니다.

use mongodb::bson::{Bson, Document, doc};
use super::Pipeline;

/// 정렬 방향
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    fn as_bson(self) -> Bson {
        match self {
            SortOrder::Ascending => Bson::Int32(1),
            SortOrder::Descending => Bson::Int32(-1),
        }
    }
}

/// `$lookup` 설정
#[derive(Debug, Clone, PartialEq)]
pub struct Lookup {
    pub from: String,
    pub local_field: String,
    pub foreign_field: String,
    pub as_field: String,
}

/// `$bucket` 설정
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    /// 그룹 기준 필드 경로 (`$` 없이)
    pub group_by: String,
    /// 오름차순 경계값, 최소 2개
    pub boundaries: Vec<Bson>,
    /// 경계 밖의 값이 들어갈 버킷 이름
    pub default_bucket: Option<Bson>,
    /// 버킷별 누산기. 비어 있으면 서버 기본값 `{count: {$sum: 1}}`
    pub output: Document,
}

/// `$graphLookup` 설정
#[derive(Debug, Clone, PartialEq)]
pub struct GraphLookup {
    pub from: String,
    /// 시작 값 필드 경로 (`$` 없이)
    pub start_with: String,
    pub connect_from_field: String,
    pub connect_to_field: String,
    pub as_field: String,
}

/// `$merge` 설정
///
/// `on`은 대상 컬렉션에서 고유 인덱스가 있는 필드여야 합니다.
/// 일치/불일치 시 동작은 서버 기본값(`merge` / `insert`)을 따릅니다.
#[derive(Debug, Clone, PartialEq)]
pub struct Merge {
    pub into: String,
    pub on: String,
}

/// 집계 파이프라인의 한 단계
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Match(Document),
    Group { id: Bson, accumulators: Document },
    Project(Document),
    Sort(Vec<(String, SortOrder)>),
    Limit(i64),
    Skip(i64),
    Unwind(String),
    Lookup(Lookup),
    AddFields(Document),
    Count(String),
    Facet(Vec<(String, Pipeline)>),
    Bucket(Bucket),
    SortByCount(String),
    GraphLookup(GraphLookup),
    ReplaceRoot(String),
    Merge(Merge),
    Out(String),
    Sample(i64),
}

/// `address.country` → `$address.country`
fn field_ref(path: &str) -> String {
    if path.starts_with('$') {
        path.to_string()
    } else {
        format!("${}", path)
    }
}

impl Stage {
    /// 서버가 사용하는 스테이지 연산자 이름
    pub fn operator(&self) -> &'static str {
        match self {
            Stage::Match(_) => "$match",
            Stage::Group { .. } => "$group",
            Stage::Project(_) => "$project",
            Stage::Sort(_) => "$sort",
            Stage::Limit(_) => "$limit",
            Stage::Skip(_) => "$skip",
            Stage::Unwind(_) => "$unwind",
            Stage::Lookup(_) => "$lookup",
            Stage::AddFields(_) => "$addFields",
            Stage::Count(_) => "$count",
            Stage::Facet(_) => "$facet",
            Stage::Bucket(_) => "$bucket",
            Stage::SortByCount(_) => "$sortByCount",
            Stage::GraphLookup(_) => "$graphLookup",
            Stage::ReplaceRoot(_) => "$replaceRoot",
            Stage::Merge(_) => "$merge",
            Stage::Out(_) => "$out",
            Stage::Sample(_) => "$sample",
        }
    }

    /// 결과를 컬렉션에 쓰는 스테이지 (`$out`, `$merge`)
    pub fn is_write_stage(&self) -> bool {
        matches!(self, Stage::Out(_) | Stage::Merge(_))
    }

    /// 드라이버에 전달할 BSON 문서로 렌더링합니다.
    pub fn to_document(&self) -> Document {
        let body: Bson = match self {
            Stage::Match(filter) => filter.clone().into(),
            Stage::Group { id, accumulators } => {
                let mut group = doc! { "_id": id.clone() };
                group.extend(accumulators.clone());
                group.into()
            }
            Stage::Project(spec) | Stage::AddFields(spec) => spec.clone().into(),
            Stage::Sort(keys) => {
                let mut sort = Document::new();
                for (field, order) in keys {
                    sort.insert(field.clone(), order.as_bson());
                }
                sort.into()
            }
            Stage::Limit(n) | Stage::Skip(n) => Bson::Int64(*n),
            Stage::Unwind(path) | Stage::SortByCount(path) => Bson::String(field_ref(path)),
            Stage::Lookup(lookup) => doc! {
                "from": lookup.from.as_str(),
                "localField": lookup.local_field.as_str(),
                "foreignField": lookup.foreign_field.as_str(),
                "as": lookup.as_field.as_str(),
            }
            .into(),
            Stage::Count(field) => Bson::String(field.clone()),
            Stage::Facet(facets) => {
                let mut facet = Document::new();
                for (name, pipeline) in facets {
                    let stages: Vec<Bson> =
                        pipeline.to_documents().into_iter().map(Bson::Document).collect();
                    facet.insert(name.clone(), stages);
                }
                facet.into()
            }
            Stage::Bucket(bucket) => {
                let mut spec = doc! {
                    "groupBy": field_ref(&bucket.group_by),
                    "boundaries": bucket.boundaries.clone(),
                };
                if let Some(default_bucket) = &bucket.default_bucket {
                    spec.insert("default", default_bucket.clone());
                }
                if !bucket.output.is_empty() {
                    spec.insert("output", bucket.output.clone());
                }
                spec.into()
            }
            Stage::GraphLookup(graph) => doc! {
                "from": graph.from.as_str(),
                "startWith": field_ref(&graph.start_with),
                "connectFromField": graph.connect_from_field.as_str(),
                "connectToField": graph.connect_to_field.as_str(),
                "as": graph.as_field.as_str(),
            }
            .into(),
            Stage::ReplaceRoot(path) => doc! { "newRoot": field_ref(path) }.into(),
            Stage::Merge(merge) => doc! {
                "into": merge.into.as_str(),
                "on": merge.on.as_str(),
            }
            .into(),
            Stage::Out(collection) => Bson::String(collection.clone()),
            Stage::Sample(size) => doc! { "size": *size }.into(),
        };

        let mut stage = Document::new();
        stage.insert(self.operator(), body);
        stage
    }
}
