use serde_json::Value;

use crate::gallery::{gallery_view, GalleryView};
use crate::render_value::{render_fields, render_value, RenderedValue};
use crate::stats::{aggregate, CategorySummary};
use crate::{format_date, AppState, DetailState, DetailTab, SkuMatchResult, SkuRecord, StatusFilter};

/// Placeholder for missing text fields.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub status_filter: StatusFilter,
    pub sku_search: String,
    pub list: ListView,
    pub detail: Option<DetailView>,
    pub stats: StatsView,
    pub workflows: WorkflowsView,
    pub preview: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListView {
    pub loading: bool,
    pub error: Option<String>,
    pub loaded: bool,
    pub rows: Vec<SkuRowView>,
    pub footer: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkuRowView {
    pub index: usize,
    pub sku: String,
    pub category: String,
    pub sub_category: String,
    pub status: String,
    pub image_processing_status: String,
    pub updated_at: String,
    pub filtered_image_count: usize,
    pub search_result_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub sku: String,
    pub category_line: String,
    pub status: String,
    pub image_processing_status: String,
    pub filtered_image_count: usize,
    pub search_result_count: usize,
    pub tab: DetailTab,
    pub content: TabContent,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TabContent {
    Attributes(Vec<(String, String)>),
    CustomAttributes(Vec<(String, RenderedValue)>),
    Images(GalleryView),
    ScrapedWebsites(Vec<SearchResultView>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResultView {
    pub index: usize,
    pub url: String,
    pub title: Option<String>,
    pub category_match: Option<bool>,
    pub is_product_page: Option<bool>,
    pub sku_match: Option<SkuMatchResult>,
    pub expanded: bool,
    /// `None` when the page carried no product object.
    pub product_information: Option<Vec<(String, RenderedValue)>>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatsView {
    pub loading: bool,
    pub error: Option<String>,
    pub loaded: bool,
    pub panels: Vec<CategoryPanelView>,
    pub footer: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryPanelView {
    pub summary: CategorySummary,
    pub collapsed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WorkflowsView {
    pub loading: bool,
    pub error: Option<String>,
    pub loaded: bool,
    pub workflows: Vec<WorkflowRowView>,
    pub footer: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowRowView {
    pub id: String,
    pub name: String,
    pub running: bool,
    pub tags: Vec<String>,
}

pub(crate) fn build(state: &AppState) -> AppViewModel {
    AppViewModel {
        status_filter: state.filter().status_filter,
        sku_search: state.filter().sku_search.clone(),
        list: list_view(state),
        detail: state.detail().map(detail_view),
        stats: stats_view(state),
        workflows: workflows_view(state),
        preview: state.preview().map(str::to_string),
    }
}

fn or_na(value: Option<&String>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.clone(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn plural(count: usize, noun: &str, singular: &str, plural: &str) -> String {
    let suffix = if count == 1 { singular } else { plural };
    format!("Showing {count} {noun}{suffix}")
}

fn list_view(state: &AppState) -> ListView {
    let remote = state.skus();
    let rows: Vec<SkuRowView> = remote
        .data()
        .iter()
        .enumerate()
        .map(|(index, record)| row_view(index, record))
        .collect();
    ListView {
        loading: remote.is_loading(),
        error: remote.error().map(str::to_string),
        loaded: remote.is_loaded(),
        footer: plural(rows.len(), "SKU", "", "s"),
        rows,
    }
}

fn row_view(index: usize, record: &SkuRecord) -> SkuRowView {
    SkuRowView {
        index,
        sku: or_na(record.sku.as_ref()),
        category: or_na(record.category.as_ref()),
        sub_category: or_na(record.sub_category.as_ref()),
        status: or_na(record.status.as_ref()),
        image_processing_status: or_na(record.image_processing_status.as_ref()),
        updated_at: format_date(record.updated_at.as_deref()),
        filtered_image_count: record.image_urls.len(),
        search_result_count: record.search_result.len(),
    }
}

fn detail_view(detail: &DetailState) -> DetailView {
    let record = detail.record();
    let category = record.category.clone().unwrap_or_default();
    let category_line = match record.sub_category.as_deref() {
        Some(sub) if !sub.is_empty() => format!("{category} • {sub}"),
        _ => category,
    };

    let content = match detail.tab() {
        DetailTab::Attributes => TabContent::Attributes(
            record
                .attributes
                .iter()
                .map(|(key, value)| (key.clone(), render_value(value).to_string()))
                .collect(),
        ),
        DetailTab::CustomAttributes => {
            TabContent::CustomAttributes(render_fields(&record.custom_attributes))
        }
        DetailTab::Images => TabContent::Images(gallery_view(
            &record.image_urls,
            &record.image_urls_raw,
            detail.gallery(),
        )),
        DetailTab::ScrapedWebsites => TabContent::ScrapedWebsites(
            record
                .search_result
                .iter()
                .enumerate()
                .map(|(index, entry)| {
                    let response = entry.response.as_ref();
                    SearchResultView {
                        index,
                        url: or_na(entry.url.as_ref()),
                        title: entry.title.clone(),
                        category_match: response.and_then(|r| r.category_match),
                        is_product_page: response.and_then(|r| r.is_product_page),
                        sku_match: response.and_then(|r| r.sku_match_result.clone()),
                        expanded: detail.open_result() == Some(index),
                        product_information: response
                            .and_then(|r| r.product_information.as_ref())
                            .and_then(product_information_view),
                    }
                })
                .collect(),
        ),
    };

    DetailView {
        sku: or_na(record.sku.as_ref()),
        category_line,
        status: or_na(record.status.as_ref()),
        image_processing_status: or_na(record.image_processing_status.as_ref()),
        filtered_image_count: record.image_urls.len(),
        search_result_count: record.search_result.len(),
        tab: detail.tab(),
        content,
    }
}

// Top-level nulls and empty strings carry no information on a product page.
fn product_information_view(info: &Value) -> Option<Vec<(String, RenderedValue)>> {
    let map = info.as_object()?;
    Some(render_fields(map.iter().filter(|(_, value)| {
        !matches!(value, Value::Null) && value.as_str() != Some("")
    })))
}

fn stats_view(state: &AppState) -> StatsView {
    let remote = state.stats();
    let panels: Vec<CategoryPanelView> = aggregate(remote.data())
        .into_iter()
        .map(|summary| CategoryPanelView {
            collapsed: state.is_collapsed(&summary.category),
            summary,
        })
        .collect();
    StatsView {
        loading: remote.is_loading(),
        error: remote.error().map(str::to_string),
        loaded: remote.is_loaded(),
        footer: plural(panels.len(), "categor", "y", "ies"),
        panels,
    }
}

fn workflows_view(state: &AppState) -> WorkflowsView {
    let remote = state.workflows();
    let workflows: Vec<WorkflowRowView> = remote
        .data()
        .iter()
        .map(|workflow| WorkflowRowView {
            id: workflow
                .workflow_id
                .as_ref()
                .map_or_else(String::new, |id| id.to_string()),
            name: match workflow.workflow_name.as_deref() {
                Some(name) if !name.is_empty() => name.to_string(),
                _ => "Unnamed Workflow".to_string(),
            },
            running: workflow.running,
            tags: workflow.workflow_tags.clone(),
        })
        .collect();
    WorkflowsView {
        loading: remote.is_loading(),
        error: remote.error().map(str::to_string),
        loaded: remote.is_loaded(),
        footer: plural(workflows.len(), "workflow", "", "s"),
        workflows,
    }
}
