use blog_api::{AppState, Config, app};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    dotenvy::dotenv().ok();

    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    let addr = config.bind_addr.clone();
    let ttl = config.index_cache_ttl;

    // Create application state
    let state = AppState::new(config);
    let router = app(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Index page cache TTL: {}s", ttl.as_secs());
    info!("Endpoints:");
    info!("  GET       /                              - Index feed (cached)");
    info!("  GET       /group/{{slug}}/                 - Group feed");
    info!("  GET       /profile/{{username}}/           - Profile feed");
    info!("  GET|POST  /profile/{{username}}/follow/    - Follow author (auth)");
    info!("  GET|POST  /profile/{{username}}/unfollow/  - Unfollow author (auth)");
    info!("  GET       /follow/                       - Follow feed (auth)");
    info!("  GET|POST  /create/                       - Create post (auth)");
    info!("  GET       /posts/{{id}}/                   - Post detail");
    info!("  DELETE    /posts/{{id}}/                   - Delete post (author only)");
    info!("  GET|POST  /posts/{{id}}/edit/              - Edit post (author only)");
    info!("  POST      /posts/{{id}}/comment/           - Add comment (auth)");
    info!("  GET       /media/{{path}}                  - Uploaded images");
    info!("  POST      /auth/signup/                  - Create account");
    info!("  GET|POST  /auth/login/                   - Login hint / login");
    info!("  GET       /users/me/                     - Current user (auth)");
    info!("  POST      /admin/groups/                 - Create group (admin token)");
    info!("  POST      /admin/cache/clear/            - Clear page cache (admin token)");
    info!("  GET       /health                        - Health check");

    axum::serve(listener, router).await?;
    Ok(())
}
