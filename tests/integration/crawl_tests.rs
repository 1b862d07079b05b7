//! Integration tests for the crawler
//!
//! These tests use wiremock to serve listing pages and run the full
//! config → pagination → extraction → JSON file cycle end-to-end.

use gondola::catalog::{Category, CrawlResult, Subcategory};
use gondola::config::{load_crawl_plan, Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use gondola::output::SubcategoryStatus;
use gondola::{GondolaError, Orchestrator};
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, output: &Path) -> Config {
    Config {
        categories_path: "categories.json".into(),
        crawler: CrawlerConfig {
            listing_url: format!("{}/{{category}}?isGrid=true&page={{page}}", base_url),
            max_pages: 20,
            max_retries: 1,
            retry_delay_ms: 10,
            max_concurrent_sessions: 1,
            request_timeout_secs: 5,
        },
        user_agent: UserAgentConfig::default(),
        output: OutputConfig {
            directory: output.to_path_buf(),
        },
    }
}

fn product(name: &str, price: &str, availability: &str, image: &str) -> String {
    format!(
        r#"<div class="product-card" itemscope itemtype="https://schema.org/Product">
            <img src="" data-src="//cdn.example/{slug}.jpg">
            <h3 itemprop="name">{name}</h3>
            <meta itemprop="image" content="{image}">
            <div itemprop="offers" itemscope itemtype="https://schema.org/Offer">
                <meta itemprop="priceCurrency" content="BRL">
                <span itemprop="price" content="{price}">R$ {price}</span>
                <link itemprop="availability" href="https://schema.org/{availability}">
            </div>
        </div>"#,
        slug = name.to_lowercase().replace(' ', "-"),
    )
}

fn listing(products: &[String]) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!(
            "<html><body><section class=\"grid\">{}</section></body></html>",
            products.join("\n")
        ))
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, category: &str, page: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/{}", category)))
        .and(query_param("page", page))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

fn read_result(path: &Path) -> CrawlResult {
    let content = std::fs::read_to_string(path).expect("result file should exist");
    serde_json::from_str(&content).expect("result file should be valid JSON")
}

fn categories() -> Vec<Category> {
    vec![Category {
        name: "Mercearia".to_string(),
        subcategories: vec![
            Subcategory {
                name: "Arroz".to_string(),
                path: "arroz".to_string(),
            },
            Subcategory {
                name: "Bebidas".to_string(),
                path: "bebidas".to_string(),
            },
        ],
    }]
}

#[tokio::test]
async fn test_full_crawl_writes_one_file_per_subcategory() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_page(
        &server,
        "arroz",
        "1",
        listing(&[
            product("Arroz Branco Tipo 1 5kg", "21.90", "InStock", "//cdn.example/main.jpg"),
            product("Arroz Integral 1kg", "8.49", "OutOfStock", ""),
        ]),
    )
    .await;
    mount_page(
        &server,
        "arroz",
        "2",
        listing(&[product("Arroz Parboilizado 2 kg", "11.00", "InStock", "")]),
    )
    .await;
    mount_page(&server, "arroz", "3", listing(&[])).await;

    mount_page(
        &server,
        "bebidas",
        "1",
        listing(&[
            product("Refrigerante Pack 6 unidades", "19.99", "InStock", ""),
            product("Vinho Tinto Reserva 750ml", "1.299,90", "InStock", "//cdn.example/v.jpg"),
        ]),
    )
    .await;
    mount_page(&server, "bebidas", "2", listing(&[])).await;

    let config = create_test_config(&server.uri(), output.path());
    let orchestrator = Orchestrator::from_config(&config).unwrap();
    let report = orchestrator.run(&categories()).await;

    assert!(!report.has_failures());
    assert_eq!(report.total_records(), 4);

    let arroz = read_result(&output.path().join("arroz.json"));
    assert_eq!(arroz.products.len(), 2);
    assert_eq!(arroz.products[0].name, "Arroz Branco Tipo 1 5kg");
    assert_eq!(arroz.products[0].image, "//cdn.example/main.jpg");
    assert_eq!(arroz.products[0].weight, "5kg");
    assert_eq!(arroz.products[0].price, "R$ 21.90");
    assert_eq!(arroz.products[0].category, "Mercearia");
    assert_eq!(arroz.products[0].subcategory, "Arroz");
    assert_eq!(arroz.products[1].name, "Arroz Parboilizado 2 kg");
    assert_eq!(arroz.products[1].weight, "2 kg");
    assert_eq!(
        arroz.products[1].image,
        "//cdn.example/arroz-parboilizado-2-kg.jpg"
    );

    let bebidas = read_result(&output.path().join("bebidas.json"));
    assert_eq!(bebidas.products.len(), 2);
    assert_eq!(bebidas.products[0].quantity, "6 unidades");
    assert_eq!(bebidas.products[0].weight, "");
    assert_eq!(bebidas.products[1].price, "R$ 1.299,90");
    assert_eq!(bebidas.products[1].weight, "750ml");

    let raw: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(output.path().join("bebidas.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(raw["products"][0]["subcategoria"], "Bebidas");
}

#[tokio::test]
async fn test_server_error_fails_only_its_subcategory() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_page(
        &server,
        "arroz",
        "1",
        listing(&[product("Arroz 5kg", "21.90", "InStock", "//cdn.example/a.jpg")]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/arroz"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    mount_page(
        &server,
        "bebidas",
        "1",
        listing(&[product("Suco 1 litro", "6.50", "InStock", "//cdn.example/s.jpg")]),
    )
    .await;
    mount_page(&server, "bebidas", "2", listing(&[])).await;

    let config = create_test_config(&server.uri(), output.path());
    let orchestrator = Orchestrator::from_config(&config).unwrap();
    let report = orchestrator.run(&categories()).await;

    assert!(matches!(
        report.outcomes[0].status,
        SubcategoryStatus::Failed(GondolaError::Fetch { cursor: 2, .. })
    ));
    assert!(matches!(
        report.outcomes[1].status,
        SubcategoryStatus::Completed
    ));

    assert!(!output.path().join("arroz.json").exists());
    let bebidas = read_result(&output.path().join("bebidas.json"));
    assert_eq!(bebidas.products[0].weight, "1 litro");
}

#[tokio::test]
async fn test_crawl_plan_loaded_from_files() {
    let server = MockServer::start().await;
    let workdir = TempDir::new().unwrap();

    mount_page(
        &server,
        "hortifruti/frutas",
        "1",
        listing(&[product("Banana Prata 1kg", "5.99", "InStock", "//cdn.example/b.jpg")]),
    )
    .await;
    mount_page(&server, "hortifruti/frutas", "2", listing(&[])).await;

    std::fs::write(
        workdir.path().join("categories.json"),
        r#"{"hortifruti": {"name": "Hortifruti", "subcategories": [
            {"name": "Frutas", "path": "hortifruti/frutas"}
        ]}}"#,
    )
    .unwrap();
    std::fs::write(
        workdir.path().join("gondola.toml"),
        format!(
            r#"
categories-path = "categories.json"

[crawler]
listing-url = "{}/{{category}}?page={{page}}"
max-retries = 0

[output]
directory = "{}"
"#,
            server.uri(),
            workdir.path().join("out").display()
        ),
    )
    .unwrap();

    let (config, categories) = load_crawl_plan(&workdir.path().join("gondola.toml")).unwrap();
    let report = gondola::run_crawl(&config, &categories).await.unwrap();

    assert!(!report.has_failures());
    let frutas = read_result(&workdir.path().join("out").join("hortifruti").join("frutas.json"));
    assert_eq!(frutas.products.len(), 1);
    assert_eq!(frutas.products[0].category, "Hortifruti");
    assert_eq!(frutas.products[0].subcategory, "Frutas");
}
