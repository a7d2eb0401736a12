use actix_files::Files;
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use dotenvy::dotenv;
use tera::Tera;

use pushkind_inventory::config::ServerConfig;
use pushkind_inventory::notify::LogNotifier;
use pushkind_inventory::repository::HttpRepository;
use pushkind_inventory::routes::inventory::{
    change_page, clear_filter, confirm_delete, create_product, delete_product, edit_product,
    filter_inventory, new_product, reload_inventory, show_inventory, update_product,
};
use pushkind_inventory::routes::main::show_index;
use pushkind_inventory::services::inventory::InventoryController;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let secret_key = match config.secret.as_deref().map(|key| Key::try_from(key.as_bytes())) {
        Some(Ok(key)) => key,
        Some(Err(e)) => {
            log::warn!("SECRET_KEY is unusable ({e}), generating a random key");
            Key::generate()
        }
        None => Key::generate(),
    };

    let repo = match HttpRepository::new(&config.catalog) {
        Ok(repo) => repo,
        Err(e) => {
            log::error!("Failed to build catalog client: {e}");
            std::process::exit(1);
        }
    };

    let inventory = web::Data::new(InventoryController::new(repo, config.catalog.load_limit));
    if let Err(e) = inventory.load(&LogNotifier).await {
        log::warn!("Initial product load failed, starting with an empty inventory: {e}");
    }

    let message_store = CookieMessageStore::builder(secret_key).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = match Tera::new("templates/**/*") {
        Ok(t) => t,
        Err(e) => {
            log::error!("Parsing error(s): {e}");
            std::process::exit(1);
        }
    };

    HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(show_index)
            .service(show_inventory)
            .service(filter_inventory)
            .service(clear_filter)
            .service(change_page)
            .service(reload_inventory)
            .service(new_product)
            .service(create_product)
            .service(edit_product)
            .service(update_product)
            .service(confirm_delete)
            .service(delete_product)
            .app_data(web::Data::new(tera.clone()))
            .app_data(inventory.clone())
    })
    .bind((config.address, config.port))?
    .run()
    .await
}
