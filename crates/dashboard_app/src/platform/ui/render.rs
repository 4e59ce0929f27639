use std::fmt::Write as _;

use dashboard_core::{
    is_image_url, status_label, AppViewModel, CategoryPanelView, DetailTab, DetailView,
    GalleryView, ImageTile, ListView, RenderedValue, SearchResultView, StatsView, TabContent,
    WorkflowsView,
};

use super::constants::*;

/// Full watch-mode screen: filters, table, and whichever panels are open.
pub fn render_dashboard(
    view: &AppViewModel,
    workflow_link: &dyn Fn(&str) -> Option<String>,
) -> String {
    let mut out = render_list(view);
    if let Some(detail) = &view.detail {
        out.push('\n');
        out.push_str(&render_detail(detail));
    }
    if view.stats.loading || view.stats.loaded || view.stats.error.is_some() {
        out.push('\n');
        out.push_str(&render_stats(&view.stats));
    }
    if view.workflows.loading || view.workflows.loaded || view.workflows.error.is_some() {
        out.push('\n');
        out.push_str(&render_workflows(&view.workflows, workflow_link));
    }
    if let Some(url) = &view.preview {
        out.push('\n');
        out.push_str(&render_preview(url));
    }
    out
}

pub fn render_list(view: &AppViewModel) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Status: {} | Search: \"{}\"",
        view.status_filter.label(),
        view.sku_search
    );
    render_list_body(&view.list, &mut out);
    out
}

fn render_list_body(list: &ListView, out: &mut String) {
    if list.loading {
        let _ = writeln!(out, "{LOADING_SKUS}");
    }
    if let Some(error) = &list.error {
        let _ = writeln!(out, "Error: {error} ({RETRY_HINT})");
    }
    if list.rows.is_empty() {
        if list.loaded {
            let _ = writeln!(out, "{EMPTY_SKUS}");
        }
        return;
    }

    let rows: Vec<Vec<String>> = list
        .rows
        .iter()
        .map(|row| {
            vec![
                row.index.to_string(),
                row.sku.clone(),
                row.category.clone(),
                row.sub_category.clone(),
                row.status.clone(),
                row.image_processing_status.clone(),
                row.updated_at.clone(),
                format_with_commas(row.filtered_image_count as u64),
                format_with_commas(row.search_result_count as u64),
            ]
        })
        .collect();
    for line in table(&SKU_COLUMNS, &rows) {
        let _ = writeln!(out, "{line}");
    }
    let _ = writeln!(out, "{}", list.footer);
}

pub fn render_detail(detail: &DetailView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", detail.sku);
    if !detail.category_line.is_empty() {
        let _ = writeln!(out, "{}", detail.category_line);
    }
    let _ = writeln!(out, "Status: {}", detail.status);
    let _ = writeln!(
        out,
        "Image Processing Status: {}",
        detail.image_processing_status
    );
    let _ = writeln!(
        out,
        "Filtered Image Count: {}",
        format_with_commas(detail.filtered_image_count as u64)
    );
    let _ = writeln!(
        out,
        "Search Result Count: {}",
        format_with_commas(detail.search_result_count as u64)
    );

    let tabs: Vec<String> = DetailTab::ALL
        .iter()
        .map(|tab| {
            if *tab == detail.tab {
                format!("[{}]", tab.label())
            } else {
                tab.label().to_string()
            }
        })
        .collect();
    let _ = writeln!(out, "{}", tabs.join("  "));

    match &detail.content {
        TabContent::Attributes(pairs) => {
            if pairs.is_empty() {
                let _ = writeln!(out, "{EMPTY_ATTRIBUTES}");
            }
            for (key, value) in pairs {
                let _ = writeln!(out, "{key}: {value}");
            }
        }
        TabContent::CustomAttributes(fields) => {
            if fields.is_empty() {
                let _ = writeln!(out, "{EMPTY_CUSTOM_ATTRIBUTES}");
            }
            for line in RenderedValue::Fields(fields.clone()).to_lines() {
                let _ = writeln!(out, "{line}");
            }
        }
        TabContent::Images(gallery) => render_gallery(gallery, &mut out),
        TabContent::ScrapedWebsites(results) => {
            if results.is_empty() {
                let _ = writeln!(out, "{EMPTY_WEBSITES}");
            }
            for result in results {
                render_search_result(result, &mut out);
            }
        }
    }
    out
}

fn render_gallery(gallery: &GalleryView, out: &mut String) {
    if gallery.filtered.is_empty() && gallery.all_count == 0 {
        let _ = writeln!(out, "{EMPTY_IMAGES}");
        return;
    }
    let _ = writeln!(out, "Filtered Images ({})", gallery.filtered.len());
    if gallery.filtered.is_empty() {
        let _ = writeln!(out, "  {EMPTY_FILTERED_IMAGES}");
    }
    for tile in &gallery.filtered {
        let _ = writeln!(out, "{}", tile_line(tile, false));
    }
    if let Some(all) = &gallery.all {
        let _ = writeln!(out, "All Images ({})", gallery.all_count);
        for tile in all {
            let _ = writeln!(out, "{}", tile_line(tile, true));
        }
    }
    if gallery.can_toggle {
        let _ = writeln!(out, "> {}", gallery.toggle_label);
    }
}

fn tile_line(tile: &ImageTile, badge: bool) -> String {
    let mut line = String::from("  ");
    if badge && tile.is_filtered {
        line.push_str("[Filtered] ");
    }
    line.push_str(&tile.url);
    if let Some(dimensions) = tile.dimensions {
        let _ = write!(line, " ({dimensions})");
    }
    line
}

fn render_search_result(result: &SearchResultView, out: &mut String) {
    let marker = if result.expanded { "v" } else { ">" };
    let title = result.title.as_deref().unwrap_or("");
    let _ = writeln!(out, "{marker} [{}] {} {}", result.index, result.url, title);

    let mut badges = Vec::new();
    if let Some(category_match) = result.category_match {
        badges.push(format!("Category Match: {}", yes_no(category_match)));
    }
    if let Some(product_page) = result.is_product_page {
        badges.push(format!("Product Page: {}", yes_no(product_page)));
    }
    if let Some(sku_match) = &result.sku_match {
        badges.push(format!("SKU Match: {sku_match}"));
    }
    if !badges.is_empty() {
        let _ = writeln!(out, "    {}", badges.join(" | "));
    }

    if !result.expanded {
        return;
    }
    match &result.product_information {
        Some(fields) if !fields.is_empty() => {
            let _ = writeln!(out, "    Product Information:");
            for line in RenderedValue::Fields(fields.clone()).to_lines() {
                let flag = match line.rsplit(' ').next() {
                    Some(last) if is_image_url(last) => " (image)",
                    _ => "",
                };
                let _ = writeln!(out, "      {line}{flag}");
            }
        }
        _ => {
            let _ = writeln!(out, "    {NO_PRODUCT_INFORMATION}");
        }
    }
}

pub fn render_stats(stats: &StatsView) -> String {
    let mut out = String::new();
    if stats.loading {
        let _ = writeln!(out, "{LOADING_STATS}");
    }
    if let Some(error) = &stats.error {
        let _ = writeln!(out, "Error: {error} ({RETRY_HINT})");
    }
    if stats.panels.is_empty() {
        if stats.loaded {
            let _ = writeln!(out, "{EMPTY_STATS}");
        }
        return out;
    }
    for panel in &stats.panels {
        render_panel(panel, &mut out);
    }
    let _ = writeln!(out, "{}", stats.footer);
    out
}

fn render_panel(panel: &CategoryPanelView, out: &mut String) {
    let summary = &panel.summary;
    let marker = if panel.collapsed { ">" } else { "v" };
    let _ = writeln!(
        out,
        "{marker} {}  {} / {} done ({:.1}%)",
        summary.category,
        format_with_commas(summary.non_pending_count),
        format_with_commas(summary.total_count),
        summary.total_progress
    );
    if panel.collapsed {
        return;
    }
    let rows: Vec<Vec<String>> = summary
        .statuses
        .iter()
        .map(|status| {
            vec![
                status_label(&status.status).to_string(),
                format_with_commas(status.status_count),
                format!("{:.2}%", status.percentage),
            ]
        })
        .collect();
    for line in table(&STATUS_COLUMNS, &rows) {
        let _ = writeln!(out, "    {line}");
    }
}

pub fn render_workflows(
    view: &WorkflowsView,
    workflow_link: &dyn Fn(&str) -> Option<String>,
) -> String {
    let mut out = String::new();
    if view.loading {
        let _ = writeln!(out, "{LOADING_WORKFLOWS}");
    }
    if let Some(error) = &view.error {
        let _ = writeln!(out, "Error: {error} ({RETRY_HINT})");
    }
    if view.workflows.is_empty() {
        if view.loaded {
            let _ = writeln!(out, "{EMPTY_WORKFLOWS}");
        }
        return out;
    }
    for workflow in &view.workflows {
        let state = if workflow.running {
            "Running"
        } else {
            "Not Running"
        };
        let _ = writeln!(out, "{} ({}) [{state}]", workflow.name, workflow.id);
        if let Some(link) = workflow_link(&workflow.id) {
            let _ = writeln!(out, "    {link}");
        }
        if !workflow.tags.is_empty() {
            let _ = writeln!(out, "    Tags: {}", workflow.tags.join(", "));
        }
    }
    let _ = writeln!(out, "{}", view.footer);
    out
}

pub fn render_preview(url: &str) -> String {
    format!("Preview: {url}\n")
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

fn table(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }
    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };
    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(line(headers.to_vec()));
    lines.push(
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    for row in rows {
        lines.push(line(row.iter().map(String::as_str).collect()));
    }
    lines
}

fn format_with_commas(value: u64) -> String {
    let mut out = String::new();
    for (i, ch) in value.to_string().chars().rev().enumerate() {
        if i != 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.chars().rev().collect()
}
