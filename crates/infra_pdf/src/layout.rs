//! Invoice document composition
//!
//! Single-page A4 layout: branding header, invoice metadata, supplier and
//! party blocks, one line-item row, totals, the fixed insurance terms,
//! and the consignment image (or its textual placeholder).

use chrono::Utc;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, Line, Mm, PdfDocument, PdfLayerReference, Point,
    Rgb,
};
use rust_decimal::Decimal;

use core_kernel::format_inr;
use domain_request::{premium, InsuranceRequest, RenderError};

use crate::renderer::CompanyInfo;

/// Default classification code for the single line item.
const DEFAULT_SAC_CODE: &str = "9965";

/// Placeholder rendered when no consignment image could be acquired.
pub const IMAGE_PLACEHOLDER: &str = "No consignment image on file";

const INSURANCE_TERMS: [&str; 4] = [
    "1. Coverage applies to the declared consignment only, from pickup to delivery.",
    "2. The premium shown is 0.2% of the declared consignment value.",
    "3. Claims must be reported within 48 hours of the incident with supporting documents.",
    "4. This invoice is system generated; coverage begins once the premium is paid.",
];

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 18.0;

/// Composes the invoice PDF and returns its bytes.
pub fn compose(
    request: &InsuranceRequest,
    invoice_number: &str,
    premium_amount: Decimal,
    company: &CompanyInfo,
    image_bytes: Option<&[u8]>,
) -> Result<Vec<u8>, RenderError> {
    let (doc, page, layer) = PdfDocument::new(
        format!("Invoice {invoice_number}"),
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "invoice",
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| RenderError::Compose(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| RenderError::Compose(e.to_string()))?;

    let layer = doc.get_page(page).get_layer(layer);
    let mut y = PAGE_HEIGHT - MARGIN;

    // Branding header
    layer.use_text(&company.name, 16.0, Mm(MARGIN), Mm(y), &bold);
    y -= 6.0;
    layer.use_text(&company.address, 9.0, Mm(MARGIN), Mm(y), &regular);
    y -= 4.5;
    layer.use_text(format!("Phone: {}", company.phone), 9.0, Mm(MARGIN), Mm(y), &regular);
    y -= 9.0;
    draw_rule(&layer, y);
    y -= 9.0;

    layer.use_text("INSURANCE INVOICE", 13.0, Mm(MARGIN), Mm(y), &bold);

    // Invoice metadata, right-aligned block
    let meta_x = 128.0;
    layer.use_text(
        format!("Invoice No: {invoice_number}"),
        10.0,
        Mm(meta_x),
        Mm(y),
        &regular,
    );
    y -= 5.0;
    layer.use_text(
        format!("Date: {}", Utc::now().format("%d %b %Y")),
        10.0,
        Mm(meta_x),
        Mm(y),
        &regular,
    );
    y -= 5.0;
    layer.use_text("Terms: Due on receipt", 10.0, Mm(meta_x), Mm(y), &regular);
    y -= 10.0;

    // Supplier and insured-party blocks
    layer.use_text("Supplier", 10.0, Mm(MARGIN), Mm(y), &bold);
    layer.use_text("Insured Party", 10.0, Mm(meta_x), Mm(y), &bold);
    y -= 5.0;
    layer.use_text(&company.name, 9.0, Mm(MARGIN), Mm(y), &regular);
    layer.use_text(
        request.consignor.as_deref().unwrap_or("Consignor on record"),
        9.0,
        Mm(meta_x),
        Mm(y),
        &regular,
    );
    y -= 4.5;
    layer.use_text(&company.address, 9.0, Mm(MARGIN), Mm(y), &regular);
    layer.use_text(
        format!("Phone: {}", request.submitter_phone),
        9.0,
        Mm(meta_x),
        Mm(y),
        &regular,
    );
    y -= 4.5;
    if let Some(consignee) = &request.consignee {
        layer.use_text(
            format!("Consignee: {consignee}"),
            9.0,
            Mm(meta_x),
            Mm(y),
            &regular,
        );
        y -= 4.5;
    }
    if let Some(vehicle) = &request.vehicle_number {
        layer.use_text(format!("Vehicle: {vehicle}"), 9.0, Mm(meta_x), Mm(y), &regular);
        y -= 4.5;
    }
    y -= 6.0;

    // Line-item table: item, classification code, quantity, rate, amount
    let columns = [MARGIN, 88.0, 118.0, 140.0, 168.0];
    let total = premium::line_total(request.quantity, request.rate);

    draw_rule(&layer, y + 4.0);
    layer.use_text("Item", 9.0, Mm(columns[0]), Mm(y), &bold);
    layer.use_text("SAC", 9.0, Mm(columns[1]), Mm(y), &bold);
    layer.use_text("Qty", 9.0, Mm(columns[2]), Mm(y), &bold);
    layer.use_text("Rate", 9.0, Mm(columns[3]), Mm(y), &bold);
    layer.use_text("Amount", 9.0, Mm(columns[4]), Mm(y), &bold);
    y -= 2.5;
    draw_rule(&layer, y);
    y -= 5.5;

    layer.use_text(&request.item_name, 9.0, Mm(columns[0]), Mm(y), &regular);
    layer.use_text(DEFAULT_SAC_CODE, 9.0, Mm(columns[1]), Mm(y), &regular);
    layer.use_text(
        request.quantity.to_string(),
        9.0,
        Mm(columns[2]),
        Mm(y),
        &regular,
    );
    layer.use_text(
        format_inr(request.rate.unwrap_or_default()),
        9.0,
        Mm(columns[3]),
        Mm(y),
        &regular,
    );
    layer.use_text(format_inr(total), 9.0, Mm(columns[4]), Mm(y), &regular);
    y -= 3.0;
    draw_rule(&layer, y);
    y -= 8.0;

    // Totals block
    layer.use_text("Total Amount:", 10.0, Mm(columns[3]), Mm(y), &bold);
    layer.use_text(format_inr(total), 10.0, Mm(columns[4]), Mm(y), &regular);
    y -= 5.5;
    layer.use_text("Insurance Premium (0.2%):", 10.0, Mm(108.0), Mm(y), &bold);
    layer.use_text(format_inr(premium_amount), 10.0, Mm(columns[4]), Mm(y), &bold);
    y -= 10.0;

    // Terms
    layer.use_text("Terms & Conditions", 10.0, Mm(MARGIN), Mm(y), &bold);
    y -= 5.0;
    for term in INSURANCE_TERMS {
        layer.use_text(term, 8.0, Mm(MARGIN), Mm(y), &regular);
        y -= 4.0;
    }
    y -= 6.0;

    // Consignment image, or its placeholder
    match image_bytes.and_then(decode_image) {
        Some(image) => {
            layer.use_text("Consignment reference:", 9.0, Mm(MARGIN), Mm(y), &regular);
            y -= 62.0;
            Image::from_dynamic_image(&image).add_to_layer(
                layer.clone(),
                ImageTransform {
                    translate_x: Some(Mm(MARGIN)),
                    translate_y: Some(Mm(y.max(MARGIN))),
                    dpi: Some(150.0),
                    ..Default::default()
                },
            );
        }
        None => {
            layer.use_text(IMAGE_PLACEHOLDER, 9.0, Mm(MARGIN), Mm(y), &regular);
        }
    }

    doc.save_to_bytes()
        .map_err(|e| RenderError::Compose(e.to_string()))
}

fn decode_image(bytes: &[u8]) -> Option<printpdf::image_crate::DynamicImage> {
    printpdf::image_crate::load_from_memory(bytes).ok()
}

fn draw_rule(layer: &PdfLayerReference, y: f32) {
    layer.set_outline_color(Color::Rgb(Rgb::new(0.2, 0.2, 0.2, None)));
    layer.set_outline_thickness(0.4);
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(MARGIN), Mm(y)), false),
            (Point::new(Mm(PAGE_WIDTH - MARGIN), Mm(y)), false),
        ],
        is_closed: false,
    });
}
