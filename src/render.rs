//! Server-rendered category list page.

use maud::{html, Markup, PreEscaped};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DisplayAs {
    #[default]
    Discussions,
    Categories,
    Flat,
    Heading,
}

/// One category and its children, as handed to the renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryNode {
    pub category_id: i64,
    pub name: String,
    pub url_code: String,
    /// Trusted HTML, emitted as-is.
    pub description: Option<String>,
    pub display_as: DisplayAs,
    pub count_discussions: u64,
    pub count_comments: u64,
    pub children: Vec<CategoryNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoriesPage {
    pub title: String,
    pub description: Option<String>,
    pub tree: Vec<CategoryNode>,
}

/// Extension points fired while a page renders.
pub trait PageHooks {
    fn after_page_title(&self, _out: &mut String) {}
}

/// Hooks that do nothing.
pub struct NoHooks;

impl PageHooks for NoHooks {}

pub fn render_categories_page(page: &CategoriesPage, hooks: &dyn PageHooks) -> String {
    let mut after_title = String::new();
    hooks.after_page_title(&mut after_title);
    html! {
        h1 class="H HomepageTitle" { (page.title) }
        @if let Some(desc) = non_blank(page.description.as_deref()) {
            div class="P PageDescription" { (PreEscaped(desc)) }
        }
        (PreEscaped(after_title))
        (write_category_list(&page.tree, 1))
    }
    .into_string()
}

/// Nested `<ul>` for `nodes` at `depth`; empty input renders nothing.
pub fn write_category_list(nodes: &[CategoryNode], depth: usize) -> Markup {
    html! {
        @if !nodes.is_empty() {
            ul class="DataList CategoryList" {
                @for node in nodes {
                    (category_item(node, depth))
                }
            }
        }
    }
}

fn category_item(node: &CategoryNode, depth: usize) -> Markup {
    let id = format!("Category_{}", node.category_id);
    html! {
        @if node.display_as == DisplayAs::Heading {
            li id=(id) class={ "Item CategoryHeading Depth" (depth) " Category-" (node.url_code) } {
                div class="ItemContent Category" { (node.name) }
                (write_category_list(&node.children, depth + 1))
            }
        } @else {
            li id=(id) class={ "Item Depth" (depth) " Category-" (node.url_code) } {
                div class="ItemContent Category" {
                    div class="TitleWrap" {
                        a class="Title" href={ "/categories/" (node.url_code) } { (node.name) }
                    }
                    @if let Some(desc) = non_blank(node.description.as_deref()) {
                        div class="CategoryDescription" { (PreEscaped(desc)) }
                    }
                    div class="Meta" {
                        span class="MItem DiscussionCount" { (node.count_discussions) " discussions" }
                        span class="MItem CommentCount" { (node.count_comments) " comments" }
                    }
                }
                (write_category_list(&node.children, depth + 1))
            }
        }
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> { s.filter(|d| !d.trim().is_empty()) }
