use kuchiki::NodeRef;

use crate::page::Page;
use crate::slots::{Slot, SlotMap};

/// Required slots of `page` that `doc` does not contain.
pub fn missing_slots(doc: &NodeRef, page: &Page, slots: &SlotMap) -> Vec<Slot> {
    page.required_slots()
        .iter()
        .copied()
        .filter(|slot| slots.find(doc, *slot).is_none())
        .collect()
}

/// Fails when the page template lacks any slot its sections bind into.
pub fn assert_slots_present(doc: &NodeRef, page: &Page, slots: &SlotMap) -> anyhow::Result<()> {
    let missing = missing_slots(doc, page, slots);
    if missing.is_empty() {
        return Ok(());
    }
    let names = missing
        .iter()
        .map(|slot| format!("{} ({})", slot, slots.selector(*slot)))
        .collect::<Vec<_>>()
        .join(", ");
    anyhow::bail!("strict slot check failed: {} is missing {}", page, names);
}
