use actix_web::HttpResponse;
use actix_web::http::header;
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages, Level};
use serde::Serialize;
use tera::{Context, Tera};

use crate::notify::{Notifier, Severity};
use crate::repository::HttpRepository;
use crate::services::inventory::InventoryController;

pub mod inventory;
pub mod main;

/// Controller shared by every request handler.
pub type Inventory = InventoryController<HttpRepository>;

/// Delivers controller notifications as flash messages of the current request.
pub struct FlashNotifier;

impl Notifier for FlashNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        let flash = match severity {
            Severity::Success => FlashMessage::success(message),
            Severity::Warning => FlashMessage::warning(message),
            Severity::Error => FlashMessage::error(message),
        };
        flash.send();
    }
}

#[derive(Serialize)]
struct Alert {
    level: &'static str,
    message: String,
}

fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

/// Template context shared by every page: pending alerts and the active menu entry.
pub fn base_context(flash_messages: &IncomingFlashMessages, current_page: &str) -> Context {
    let alerts: Vec<Alert> = flash_messages
        .iter()
        .map(|message| Alert {
            level: alert_level_to_str(&message.level()),
            message: message.content().to_string(),
        })
        .collect();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_page", current_page);
    context
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}
