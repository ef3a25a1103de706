// Nay's Dreams storefront server
//
// This binary starts the web server with:
// - Actix-web for HTTP serving
// - Leptos for SSR (server-side rendering)
// - The configured product backend (PocketBase or REST) and translator
// - Static file serving

#[cfg(feature = "ssr")]
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    use actix_files::Files;
    use actix_web::{web, App, HttpServer};
    use anyhow::Context;
    use leptos::prelude::*;
    use leptos_actix::{generate_route_list, handle_server_fns_with_context, LeptosRoutes};
    use leptos_meta::MetaTags;
    use nays_dreams::config::Config;
    use nays_dreams::web_app::api::state;
    use nays_dreams::web_app::app::App as WebApp;
    use tracing_subscriber::EnvFilter;

    // Initialize logging; RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load().context("invalid configuration")?;
    tracing::info!("Configuration loaded: {} products per page", config.per_page);

    let backends = state::build_backends(&config).context("could not build backend clients")?;
    let settings = backends.settings;
    state::init_backends(backends);

    // Leptos configuration
    let conf = leptos_config::get_configuration(None).context("could not read Leptos configuration")?;
    let leptos_options = conf.leptos_options;
    let addr = leptos_options.site_addr;
    let site_root = leptos_options.site_root.clone();

    tracing::info!("Starting server at http://{}", addr);

    HttpServer::new(move || {
        // Generate the list of routes in the Leptos App
        let routes = generate_route_list(WebApp);
        let leptos_options_inner = leptos_options.clone();
        let site_root_str = site_root.clone().to_string();

        App::new()
            // Server functions also read the discovery settings from context
            .route(
                "/api/{tail:.*}",
                handle_server_fns_with_context(move || provide_context(settings)),
            )
            // Serve JS/WASM/CSS from pkg directory
            .service(Files::new("/pkg", format!("{site_root_str}/pkg")))
            .leptos_routes_with_context(
                routes,
                move || provide_context(settings),
                {
                    let leptos_options = leptos_options_inner.clone();
                    move || {
                        view! {
                            <!DOCTYPE html>
                            <html lang="es">
                                <head>
                                    <meta charset="utf-8"/>
                                    <meta name="viewport" content="width=device-width, initial-scale=1"/>
                                    <AutoReload options=leptos_options.clone() />
                                    <HydrationScripts options=leptos_options.clone()/>
                                    <MetaTags/>
                                </head>
                                <body>
                                    <WebApp/>
                                </body>
                            </html>
                        }
                    }
                },
            )
            .app_data(web::Data::new(leptos_options_inner.clone()))
    })
    .bind(&addr)?
    .run()
    .await?;

    Ok(())
}

#[cfg(not(feature = "ssr"))]
fn main() {
    eprintln!("This binary requires the 'ssr' feature. Run with: cargo leptos watch");
}
