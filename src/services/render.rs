//! Chat-facing rendering of the shopping list and the clear-flow notices.
//!
//! Every function here is pure: same input list, same offset, same text.

use time::UtcOffset;

use crate::catalog;
use crate::services::chat::ButtonId;
use crate::services::list::ShoppingListEntry;
use crate::telegram::types::Button;

pub const EMPTY_LIST_MESSAGE: &str = "🛒 Tu lista de compras está vacía.";
pub const CANCELLED_NOTICE: &str = "❌ Operación cancelada. Tu lista sigue intacta.";

/// Formats list snapshots. Carries the display offset so timestamps read in
/// the household's local time.
#[derive(Debug, Clone, Copy)]
pub struct ListRenderer {
    offset: UtcOffset,
}

impl ListRenderer {
    #[must_use]
    pub fn new(offset: UtcOffset) -> Self {
        Self { offset }
    }

    /// Render the list message: header with count, numbered lines, last-added trailer.
    #[must_use]
    pub fn render(&self, list: &[ShoppingListEntry]) -> String {
        let Some(last) = list.last() else {
            return EMPTY_LIST_MESSAGE.to_owned();
        };

        let lines = list
            .iter()
            .enumerate()
            .map(|(i, entry)| format!("{}. {} {}", i + 1, catalog::glyph_for(&entry.product), entry.product))
            .collect::<Vec<_>>()
            .join("\n");

        let local = last.added_at.to_offset(self.offset);
        format!(
            "🛒 LISTA DE COMPRAS ({})\n\n{lines}\n\n🕐 Último agregado: {} a las {:02}:{:02}",
            products_label(list.len()),
            last.product,
            local.hour(),
            local.minute(),
        )
    }
}

/// Confirmation prompt shown before clearing.
#[must_use]
pub fn clear_prompt(count: usize) -> String {
    if count == 0 {
        return "⚠️ ¿Seguro que quieres limpiar la lista? Ya está vacía.".to_owned();
    }
    format!("⚠️ ¿Seguro que quieres limpiar la lista? Se eliminarán {}.", products_label(count))
}

#[must_use]
pub fn cleared_notice(removed: usize) -> String {
    format!("✅ Lista limpiada. Se eliminaron {}.", products_label(removed))
}

fn products_label(count: usize) -> String {
    if count == 1 { "1 producto".to_owned() } else { format!("{count} productos") }
}

// =============================================================================
// BUTTON SETS
// =============================================================================

/// Buttons attached to list notifications.
#[must_use]
pub fn list_buttons() -> Vec<Button> {
    vec![
        Button::new("🔄 Actualizar", ButtonId::ListAgain),
        Button::new("🗑️ Limpiar lista", ButtonId::ClearList),
    ]
}

/// Single clear button attached to the `/list` reply.
#[must_use]
pub fn clear_button() -> Vec<Button> {
    vec![Button::new("🗑️ Limpiar lista", ButtonId::ClearList)]
}

#[must_use]
pub fn confirm_buttons() -> Vec<Button> {
    vec![
        Button::new("✅ Sí, limpiar", ButtonId::ConfirmClear),
        Button::new("❌ Cancelar", ButtonId::CancelClear),
    ]
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
