//! Read-only car renderings shared by the public catalog and the wizard preview.
//!
//! One data-driven template serves every model: the spec sheet is built from
//! whatever specification keys a car and its trims declare, in catalogue order.

use serde::Serialize;

use crate::draft::{CarDraft, PendingImage, Specification};
use crate::spec_keys::SpecKey;
use crate::types::DbId;

/// Everything a card or spec sheet needs, independent of where it came from.
#[derive(Debug, Clone, Default)]
pub struct CarView {
    pub id: Option<DbId>,
    pub name: String,
    pub base_price: String,
    pub image_url: Option<String>,
    pub specification: Specification,
    pub trims: Vec<TrimView>,
    pub colors: Vec<ColorView>,
    pub interiors: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TrimView {
    pub name: String,
    pub price: String,
    pub specification: Specification,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ColorView {
    pub name: String,
    pub code: String,
    pub image_url: Option<String>,
}

impl CarView {
    /// Only entries that would be persisted on submission are shown. A staged
    /// upload wins over the published image and is addressed via `staged_url`.
    pub fn from_draft(draft: &CarDraft, staged_url: impl Fn(&PendingImage) -> String) -> Self {
        let image = |pending: &Option<PendingImage>, published: &Option<String>| {
            pending.as_ref().map(&staged_url).or_else(|| published.clone())
        };
        Self {
            id: draft.id,
            name: draft.name.clone(),
            base_price: draft.base_price.clone(),
            image_url: image(&draft.pending_image, &draft.image_url),
            specification: draft.specification.clone(),
            trims: draft
                .trims
                .iter()
                .filter(|t| t.is_complete())
                .map(|t| TrimView {
                    name: t.name.clone(),
                    price: t.price.clone(),
                    specification: t.specification.clone(),
                })
                .collect(),
            colors: draft
                .colors
                .iter()
                .filter(|c| c.is_complete())
                .map(|c| ColorView {
                    name: c.name.clone(),
                    code: c.code.clone(),
                    image_url: image(&c.pending_image, &c.image_url),
                })
                .collect(),
            interiors: draft
                .interiors
                .iter()
                .filter(|i| i.is_complete())
                .map(|i| i.name.clone())
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Rendered output
// ---------------------------------------------------------------------------

/// Catalog card summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarCard {
    pub id: Option<DbId>,
    pub name: String,
    pub price: String,
    /// Lowest trim price, when any trim has a numeric price.
    pub from_price: Option<String>,
    pub image_url: Option<String>,
    pub trim_count: usize,
    pub swatches: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecRow {
    pub key: String,
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrimSheet {
    pub name: String,
    pub price: String,
    pub specs: Vec<SpecRow>,
}

/// Full spec sheet of a car.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecSheet {
    pub id: Option<DbId>,
    pub name: String,
    pub price: String,
    pub image_url: Option<String>,
    pub specs: Vec<SpecRow>,
    pub features: Vec<String>,
    pub trims: Vec<TrimSheet>,
    pub colors: Vec<ColorView>,
    pub interiors: Vec<String>,
}

/// Card and spec sheet rendered together, as the wizard preview shows them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preview {
    pub card: CarCard,
    pub spec_sheet: SpecSheet,
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Format a price string as dollars with thousands separators.
///
/// `"45000"` becomes `"$45,000"`, `"1234.5"` becomes `"$1,234.50"`. Anything
/// that is not a plain non-negative number is returned unchanged.
pub fn format_price(raw: &str) -> String {
    let trimmed = raw.trim().trim_start_matches('$').replace(',', "");
    let Some((whole, cents)) = split_amount(&trimmed) else {
        return raw.to_string();
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match cents {
        Some(c) => format!("${grouped}.{c}"),
        None => format!("${grouped}"),
    }
}

/// Split `"1234.5"` into `("1234", Some("50"))`; `None` if not a number.
fn split_amount(s: &str) -> Option<(String, Option<String>)> {
    let (whole, frac) = match s.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (s, None),
    };
    if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let whole = whole.trim_start_matches('0');
    let whole = if whole.is_empty() { "0" } else { whole };

    let cents = match frac {
        None => None,
        Some(f) if f.len() <= 2 && !f.is_empty() && f.chars().all(|c| c.is_ascii_digit()) => {
            Some(format!("{f:0<2}"))
        }
        Some(_) => return None,
    };
    Some((whole.to_string(), cents))
}

fn numeric_price(raw: &str) -> Option<f64> {
    raw.trim()
        .trim_start_matches('$')
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite())
}

/// Spec rows in catalogue order; unknown keys sort last under their raw name.
fn spec_rows(spec: &Specification) -> Vec<SpecRow> {
    let mut rows: Vec<(usize, SpecRow)> = spec
        .values
        .iter()
        .map(|(key, value)| {
            let parsed = SpecKey::parse(key).ok();
            (
                parsed.map(SpecKey::position).unwrap_or(usize::MAX),
                SpecRow {
                    key: key.clone(),
                    label: parsed.map(|k| k.label().to_string()).unwrap_or_else(|| key.clone()),
                    value: value.clone(),
                },
            )
        })
        .collect();
    rows.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.key.cmp(&b.1.key)));
    rows.into_iter().map(|(_, row)| row).collect()
}

pub fn render_card(car: &CarView) -> CarCard {
    let from_price = car
        .trims
        .iter()
        .filter_map(|t| numeric_price(&t.price).map(|p| (p, &t.price)))
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, raw)| format_price(raw));

    CarCard {
        id: car.id,
        name: car.name.clone(),
        price: format_price(&car.base_price),
        from_price,
        image_url: car.image_url.clone(),
        trim_count: car.trims.len(),
        swatches: car.colors.iter().map(|c| c.code.clone()).collect(),
    }
}

pub fn render_spec_sheet(car: &CarView) -> SpecSheet {
    SpecSheet {
        id: car.id,
        name: car.name.clone(),
        price: format_price(&car.base_price),
        image_url: car.image_url.clone(),
        specs: spec_rows(&car.specification),
        features: car.specification.features.clone(),
        trims: car
            .trims
            .iter()
            .map(|t| TrimSheet {
                name: t.name.clone(),
                price: format_price(&t.price),
                specs: spec_rows(&t.specification),
            })
            .collect(),
        colors: car.colors.clone(),
        interiors: car.interiors.clone(),
    }
}

/// Render a wizard draft exactly as the public catalog would show it.
pub fn render_preview(draft: &CarDraft, staged_url: impl Fn(&PendingImage) -> String) -> Preview {
    let view = CarView::from_draft(draft, staged_url);
    Preview {
        card: render_card(&view),
        spec_sheet: render_spec_sheet(&view),
    }
}
