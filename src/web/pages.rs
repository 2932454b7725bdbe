//! Server-rendered HTML for the front end. Markup lives in askama templates
//! under `templates/`, which escape every interpolated value.

use std::fmt::Display;

use askama::Template;
use axum::{http::StatusCode, response::Html};
use chrono::{DateTime, Utc};
use sea_orm::Iterable;
use serde::Deserialize;
use tracing::error;

use super::error::WebError;
use super::forms::DATETIME_LOCAL_FORMAT;
use crate::entities::{order, order_line};
use crate::models::{OrderStatus, OrderType, OrderWithLines, ProductType};

/// One-shot success banner selected by the `notice` query parameter after a redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    OrderSaved,
    OrderUpdated,
    OrderDeleted,
    LineSaved,
    LineUpdated,
    LineDeleted,
}

impl Notice {
    pub fn as_query(self) -> &'static str {
        match self {
            Notice::OrderSaved => "order_saved",
            Notice::OrderUpdated => "order_updated",
            Notice::OrderDeleted => "order_deleted",
            Notice::LineSaved => "line_saved",
            Notice::LineUpdated => "line_updated",
            Notice::LineDeleted => "line_deleted",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Notice::OrderSaved => "Order successfully saved!",
            Notice::OrderUpdated => "Order successfully updated!",
            Notice::OrderDeleted => "Order successfully deleted!",
            Notice::LineSaved => "Order line successfully saved!",
            Notice::LineUpdated => "Order line successfully updated!",
            Notice::LineDeleted => "Order line successfully deleted!",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct NoticeQuery {
    pub notice: Option<Notice>,
}

/// One `<option>` of an enum-backed `<select>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub selected: bool,
}

/// Lists every variant of `T`, marking `current` as selected.
pub fn select_options<T>(current: Option<T>) -> Vec<SelectOption>
where
    T: Iterable + Display + PartialEq + Copy,
{
    T::iter()
        .map(|option| SelectOption {
            value: option.to_string(),
            selected: Some(option) == current,
        })
        .collect()
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate<'a> {
    title: String,
    notice: Option<&'static str>,
    message: &'a str,
}

#[derive(Template)]
#[template(path = "orders.html")]
struct OrderListTemplate<'a> {
    title: &'static str,
    notice: Option<&'static str>,
    orders: &'a [OrderWithLines],
    order_types: Vec<SelectOption>,
    order_statuses: Vec<SelectOption>,
}

#[derive(Template)]
#[template(path = "order.html")]
struct OrderDetailTemplate<'a> {
    title: String,
    notice: Option<&'static str>,
    order: &'a order::Model,
    lines: &'a [order_line::Model],
    created: String,
    order_date: String,
    next_line: i32,
    order_types: Vec<SelectOption>,
    order_statuses: Vec<SelectOption>,
    product_types: Vec<SelectOption>,
}

#[derive(Template)]
#[template(path = "order_lines.html")]
struct OrderLineListTemplate<'a> {
    title: &'static str,
    notice: Option<&'static str>,
    lines: &'a [order_line::Model],
}

#[derive(Template)]
#[template(path = "order_line.html")]
struct OrderLineDetailTemplate<'a> {
    title: String,
    notice: Option<&'static str>,
    line: &'a order_line::Model,
    product_types: Vec<SelectOption>,
}

fn render<T: Template>(template: &T) -> Result<Html<String>, WebError> {
    Ok(Html(template.render()?))
}

fn datetime_local(value: &DateTime<Utc>) -> String {
    value.format(DATETIME_LOCAL_FORMAT).to_string()
}

/// Suggested number for the next line added to an order.
fn next_line_number(lines: &[order_line::Model]) -> i32 {
    lines
        .iter()
        .map(|line| line.line_number)
        .max()
        .unwrap_or(0)
        .saturating_add(1)
}

pub fn error_page(status: StatusCode, message: &str) -> Html<String> {
    let title = status
        .canonical_reason()
        .map(|reason| format!("{} {}", status.as_u16(), reason))
        .unwrap_or_else(|| status.as_u16().to_string());
    let template = ErrorTemplate {
        title,
        notice: None,
        message,
    };
    template.render().map(Html).unwrap_or_else(|err| {
        error!(error = %err, "failed to render error page");
        Html(format!("<h1>{}</h1>", template.title))
    })
}

pub fn order_list(
    orders: &[OrderWithLines],
    notice: Option<Notice>,
) -> Result<Html<String>, WebError> {
    render(&OrderListTemplate {
        title: "Orders",
        notice: notice.map(Notice::message),
        orders,
        order_types: select_options::<OrderType>(None),
        order_statuses: select_options(Some(OrderStatus::New)),
    })
}

pub fn order_detail(
    entry: &OrderWithLines,
    notice: Option<Notice>,
) -> Result<Html<String>, WebError> {
    let order = &entry.order;
    render(&OrderDetailTemplate {
        title: format!("Order {}", order.order_number),
        notice: notice.map(Notice::message),
        order,
        lines: &entry.order_lines,
        created: order.order_created_date.to_rfc3339(),
        order_date: datetime_local(&order.order_date),
        next_line: next_line_number(&entry.order_lines),
        order_types: select_options(Some(order.order_type)),
        order_statuses: select_options(Some(order.order_status)),
        product_types: select_options::<ProductType>(None),
    })
}

pub fn order_line_list(
    lines: &[order_line::Model],
    notice: Option<Notice>,
) -> Result<Html<String>, WebError> {
    render(&OrderLineListTemplate {
        title: "Order lines",
        notice: notice.map(Notice::message),
        lines,
    })
}

pub fn order_line_detail(
    line: &order_line::Model,
    notice: Option<Notice>,
) -> Result<Html<String>, WebError> {
    render(&OrderLineDetailTemplate {
        title: format!("Order line {}", line.line_number),
        notice: notice.map(Notice::message),
        line,
        product_types: select_options(Some(line.product_type)),
    })
}
