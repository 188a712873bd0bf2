//! Renderer tests covering the image acquisition pipeline

use rust_decimal_macros::dec;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use domain_request::InvoiceRenderer;
use infra_pdf::{CompanyInfo, PdfInvoiceRenderer, RenderConfig};
use test_utils::TestRequestBuilder;

const INVOICE_NUMBER: &str = "INV-1722945600000-0A1B";

fn config(invoice_dir: &std::path::Path, assets_dir: &std::path::Path) -> RenderConfig {
    RenderConfig {
        invoice_dir: invoice_dir.to_path_buf(),
        assets_dir: assets_dir.to_path_buf(),
        public_base_url: "https://insure.example.com".to_string(),
        image_timeout_secs: 5,
        company: CompanyInfo {
            name: "Transit Insure Pvt Ltd".to_string(),
            address: "14 Residency Road, Bengaluru 560025".to_string(),
            phone: "918044556677".to_string(),
        },
    }
}

fn tiny_png() -> Vec<u8> {
    let mut png = Vec::new();
    printpdf::image_crate::DynamicImage::new_rgb8(4, 4)
        .write_to(
            &mut std::io::Cursor::new(&mut png),
            printpdf::image_crate::ImageOutputFormat::Png,
        )
        .unwrap();
    png
}

#[tokio::test]
async fn renders_and_persists_the_invoice_document() {
    let invoice_dir = tempfile::tempdir().unwrap();
    let assets_dir = tempfile::tempdir().unwrap();
    let renderer = PdfInvoiceRenderer::new(config(invoice_dir.path(), assets_dir.path()));

    let request = TestRequestBuilder::new().build_pending();
    let document = renderer
        .render(&request, INVOICE_NUMBER, dec!(8.87))
        .await
        .unwrap();

    assert_eq!(document.file_name, format!("{INVOICE_NUMBER}.pdf"));
    assert_eq!(
        document.location,
        format!("https://insure.example.com/invoices/{INVOICE_NUMBER}.pdf")
    );

    let written = std::fs::read(invoice_dir.path().join(&document.file_name)).unwrap();
    assert!(written.starts_with(b"%PDF"));
}

#[tokio::test]
async fn embeds_a_downloaded_consignment_image() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/consignment.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(tiny_png()))
        .expect(1)
        .mount(&server)
        .await;

    let invoice_dir = tempfile::tempdir().unwrap();
    let assets_dir = tempfile::tempdir().unwrap();
    let renderer = PdfInvoiceRenderer::new(config(invoice_dir.path(), assets_dir.path()));

    let request = TestRequestBuilder::new()
        .with_image_url(format!("{}/consignment.png", server.uri()))
        .build_pending();

    let document = renderer
        .render(&request, INVOICE_NUMBER, dec!(8.87))
        .await
        .unwrap();

    assert!(invoice_dir.path().join(&document.file_name).is_file());
}

#[tokio::test]
async fn falls_back_to_a_local_image_when_download_fails() {
    let invoice_dir = tempfile::tempdir().unwrap();
    let assets_dir = tempfile::tempdir().unwrap();

    let request = TestRequestBuilder::new()
        // Nothing listens on the discard port; the download will fail
        .with_image_url("http://127.0.0.1:9/consignment.png")
        .build_pending();

    // Local convention keyed by submitter phone
    std::fs::write(
        assets_dir.path().join("919876543210.png"),
        tiny_png(),
    )
    .unwrap();

    let renderer = PdfInvoiceRenderer::new(config(invoice_dir.path(), assets_dir.path()));
    let document = renderer
        .render(&request, INVOICE_NUMBER, dec!(8.87))
        .await
        .unwrap();

    assert!(invoice_dir.path().join(&document.file_name).is_file());
}

#[tokio::test]
async fn renders_the_placeholder_when_no_image_exists_anywhere() {
    let invoice_dir = tempfile::tempdir().unwrap();
    let assets_dir = tempfile::tempdir().unwrap();

    let request = TestRequestBuilder::new()
        .with_image_url("http://127.0.0.1:9/consignment.png")
        .build_pending();

    let renderer = PdfInvoiceRenderer::new(config(invoice_dir.path(), assets_dir.path()));
    let document = renderer
        .render(&request, INVOICE_NUMBER, dec!(8.87))
        .await
        .unwrap();

    // The render degrades to the placeholder instead of failing
    let written = std::fs::read(invoice_dir.path().join(&document.file_name)).unwrap();
    assert!(written.starts_with(b"%PDF"));
}
