//! Product catalog: maps product names to display glyphs.
//!
//! Lookup is case-insensitive on the full product text. Anything not in the
//! table renders with the generic package glyph.

/// Glyph for products the catalog does not know.
pub const FALLBACK_GLYPH: &str = "📦";

const GLYPHS: &[(&str, &str)] = &[
    // Lácteos y huevos
    ("leche", "🥛"),
    ("queso", "🧀"),
    ("mantequilla", "🧈"),
    ("yogur", "🥛"),
    ("huevo", "🥚"),
    ("huevos", "🥚"),
    // Panadería y despensa
    ("pan", "🍞"),
    ("arroz", "🍚"),
    ("pasta", "🍝"),
    ("cereal", "🥣"),
    ("galletas", "🍪"),
    ("chocolate", "🍫"),
    ("sal", "🧂"),
    ("azúcar", "🍬"),
    ("aceite", "🫒"),
    ("miel", "🍯"),
    // Carnes
    ("carne", "🥩"),
    ("pollo", "🍗"),
    ("pescado", "🐟"),
    ("jamón", "🥓"),
    ("tocino", "🥓"),
    // Frutas
    ("manzana", "🍎"),
    ("manzanas", "🍎"),
    ("plátano", "🍌"),
    ("plátanos", "🍌"),
    ("naranja", "🍊"),
    ("naranjas", "🍊"),
    ("limón", "🍋"),
    ("limones", "🍋"),
    ("fresas", "🍓"),
    ("uvas", "🍇"),
    ("aguacate", "🥑"),
    // Verduras
    ("tomate", "🍅"),
    ("tomates", "🍅"),
    ("zanahoria", "🥕"),
    ("zanahorias", "🥕"),
    ("papa", "🥔"),
    ("papas", "🥔"),
    ("cebolla", "🧅"),
    ("ajo", "🧄"),
    ("lechuga", "🥬"),
    ("brócoli", "🥦"),
    ("maíz", "🌽"),
    // Bebidas
    ("agua", "💧"),
    ("café", "☕"),
    ("té", "🍵"),
    ("jugo", "🧃"),
    ("cerveza", "🍺"),
    ("vino", "🍷"),
    // Hogar
    ("jabón", "🧼"),
    ("papel", "🧻"),
    ("detergente", "🧴"),
];

/// Resolve the display glyph for a product name.
#[must_use]
pub fn glyph_for(product: &str) -> &'static str {
    let key = product.trim().to_lowercase();
    GLYPHS
        .iter()
        .find(|(name, _)| *name == key)
        .map_or(FALLBACK_GLYPH, |&(_, glyph)| glyph)
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
