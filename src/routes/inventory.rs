use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::filter::FilterCriteria;
use crate::domain::pagination::PageChange;
use crate::forms::products::{DeleteProductForm, FormErrors, ProductForm};
use crate::routes::{FlashNotifier, Inventory, base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::inventory::{DeleteOutcome, FormMode, ProductFormData};

const INVENTORY_PATH: &str = "/inventory";

#[get("/inventory")]
pub async fn show_inventory(
    inventory: web::Data<Inventory>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut context = base_context(&flash_messages, "inventory");
    context.insert("inventory", &inventory.view());
    render_template(&tera, "inventory/index.html", &context)
}

#[post("/inventory/filter")]
pub async fn filter_inventory(inventory: web::Data<Inventory>, body: web::Bytes) -> impl Responder {
    let criteria: FilterCriteria = match serde_html_form::from_bytes(&body) {
        Ok(criteria) => criteria,
        Err(err) => {
            log::warn!("Rejected filter submission: {err}");
            FlashMessage::error("Invalid filter values.").send();
            return redirect(INVENTORY_PATH);
        }
    };

    if let Err(err) = inventory.apply_filter(criteria, &FlashNotifier).await {
        log::error!("Failed to filter products: {err}");
    }
    redirect(INVENTORY_PATH)
}

#[post("/inventory/filter/clear")]
pub async fn clear_filter(inventory: web::Data<Inventory>) -> impl Responder {
    if let Err(err) = inventory
        .apply_filter(FilterCriteria::default(), &FlashNotifier)
        .await
    {
        log::error!("Failed to clear product filter: {err}");
    }
    redirect(INVENTORY_PATH)
}

#[get("/inventory/page")]
pub async fn change_page(
    inventory: web::Data<Inventory>,
    params: web::Query<PageChange>,
) -> impl Responder {
    match inventory.change_page(params.into_inner()) {
        Ok(()) => {}
        Err(ServiceError::UnsupportedPageSize(limit)) => {
            FlashMessage::error(format!("Page size {limit} is not available.")).send();
        }
        Err(err) => log::error!("Failed to change page: {err}"),
    }
    redirect(INVENTORY_PATH)
}

#[post("/inventory/reload")]
pub async fn reload_inventory(inventory: web::Data<Inventory>) -> impl Responder {
    if let Err(err) = inventory.load(&FlashNotifier).await {
        log::error!("Manual reload failed: {err}");
    }
    redirect(INVENTORY_PATH)
}

#[get("/inventory/new")]
pub async fn new_product(
    inventory: web::Data<Inventory>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let data = inventory.open_create(&FlashNotifier).await;
    render_form(&tera, &flash_messages, &data)
}

#[post("/inventory/new")]
pub async fn create_product(
    inventory: web::Data<Inventory>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    body: web::Bytes,
) -> impl Responder {
    let Some(form) = parse_product_form(&body) else {
        return redirect("/inventory/new");
    };
    let submitted = form.clone();

    match inventory.submit_create(form, &FlashNotifier).await {
        Ok(product) => {
            log::info!("Created product {}", product.id);
            redirect(INVENTORY_PATH)
        }
        Err(ServiceError::Form(errors)) => {
            rerender_with_errors(&inventory, &tera, &flash_messages, submitted, None, errors)
                .await
        }
        Err(err) => {
            log::error!("Failed to create product: {err}");
            redirect(INVENTORY_PATH)
        }
    }
}

#[get("/inventory/{product_id}/edit")]
pub async fn edit_product(
    path: web::Path<i32>,
    inventory: web::Data<Inventory>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let product_id = path.into_inner();
    let Some(product) = inventory.find_product(product_id) else {
        FlashMessage::error("Product not found.").send();
        return redirect(INVENTORY_PATH);
    };

    let data = inventory.open_edit(product, &FlashNotifier).await;
    render_form(&tera, &flash_messages, &data)
}

#[post("/inventory/{product_id}/edit")]
pub async fn update_product(
    path: web::Path<i32>,
    inventory: web::Data<Inventory>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    body: web::Bytes,
) -> impl Responder {
    let product_id = path.into_inner();

    let editing = matches!(
        inventory.form_mode(),
        Some(FormMode::Edit(product)) if product.id == product_id
    );
    if !editing {
        match inventory.find_product(product_id) {
            Some(product) => inventory.begin_edit(product),
            None => {
                FlashMessage::error("Product not found.").send();
                return redirect(INVENTORY_PATH);
            }
        }
    }

    let Some(form) = parse_product_form(&body) else {
        return redirect(&format!("/inventory/{product_id}/edit"));
    };
    let submitted = form.clone();

    match inventory.submit_update(form, &FlashNotifier).await {
        Ok(_) => redirect(INVENTORY_PATH),
        Err(ServiceError::Form(errors)) => {
            rerender_with_errors(
                &inventory,
                &tera,
                &flash_messages,
                submitted,
                Some(product_id),
                errors,
            )
            .await
        }
        Err(err) => {
            log::error!("Failed to update product {product_id}: {err}");
            redirect(INVENTORY_PATH)
        }
    }
}

#[get("/inventory/{product_id}/delete")]
pub async fn confirm_delete(
    path: web::Path<i32>,
    inventory: web::Data<Inventory>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let product_id = path.into_inner();
    let Some(product) = inventory.find_product(product_id) else {
        FlashMessage::error("Product not found.").send();
        return redirect(INVENTORY_PATH);
    };

    let mut context = base_context(&flash_messages, "inventory");
    context.insert("product", &product);
    render_template(&tera, "inventory/delete.html", &context)
}

#[post("/inventory/{product_id}/delete")]
pub async fn delete_product(
    path: web::Path<i32>,
    inventory: web::Data<Inventory>,
    body: web::Bytes,
) -> impl Responder {
    let product_id = path.into_inner();
    let Some(product) = inventory.find_product(product_id) else {
        FlashMessage::error("Product not found.").send();
        return redirect(INVENTORY_PATH);
    };

    let decision: DeleteProductForm = serde_html_form::from_bytes(&body).unwrap_or_default();

    match inventory.delete(&product, &decision, &FlashNotifier).await {
        Ok(DeleteOutcome::Deleted) => log::info!("Deleted product {product_id}"),
        Ok(DeleteOutcome::Cancelled) => {}
        Err(err) => log::error!("Failed to delete product {product_id}: {err}"),
    }
    redirect(INVENTORY_PATH)
}

fn parse_product_form(body: &[u8]) -> Option<ProductForm> {
    match serde_html_form::from_bytes::<ProductForm>(body) {
        Ok(form) => Some(form),
        Err(err) => {
            log::warn!("Rejected product form submission: {err}");
            FlashMessage::error("The submitted product form is malformed.").send();
            None
        }
    }
}

fn render_form(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    data: &ProductFormData,
) -> HttpResponse {
    let mut context = base_context(flash_messages, "inventory");
    context.insert("data", data);
    render_template(tera, "inventory/form.html", &context)
}

async fn rerender_with_errors(
    inventory: &Inventory,
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    form: ProductForm,
    product_id: Option<i32>,
    errors: FormErrors,
) -> HttpResponse {
    let categories = inventory.load_categories(&FlashNotifier).await;
    let data = ProductFormData {
        form,
        categories,
        product_id,
        errors,
    };
    render_form(tera, flash_messages, &data)
}
