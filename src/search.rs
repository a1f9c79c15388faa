use crate::domain::{
    AnimalLog, AnimalSpecies, Asset, FarmState, InventoryItem, Liability, Transaction,
    categories_by_id, species_by_id,
};

#[derive(Debug, Default)]
pub struct SearchResults {
    pub transactions: Vec<Transaction>,
    pub animals: Vec<AnimalSpecies>,
    pub animal_logs: Vec<AnimalLog>,
    pub inventory: Vec<InventoryItem>,
    pub assets: Vec<Asset>,
    pub liabilities: Vec<Liability>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
            && self.animals.is_empty()
            && self.animal_logs.is_empty()
            && self.inventory.is_empty()
            && self.assets.is_empty()
            && self.liabilities.is_empty()
    }
}

/// Case-insensitive substring search across every entity kind, each filtered
/// independently. Returns None for an empty/whitespace query: search is
/// inactive, which callers must keep distinct from "no matches".
pub fn search_all(state: &FarmState, query: &str) -> Option<SearchResults> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return None;
    }

    let categories = categories_by_id(&state.categories);
    let species = species_by_id(&state.animal_species);

    let transactions = state
        .transactions
        .iter()
        .filter(|t| {
            let mut fields = vec![
                t.description.clone(),
                t.date.to_string(),
                t.amount.to_string(),
            ];
            if let Some(c) = categories.get(&t.category_id) {
                fields.push(c.name.clone());
            }
            contains_query(&q, &fields)
        })
        .cloned()
        .collect();

    let animals = state
        .animal_species
        .iter()
        .filter(|s| {
            let mut fields = vec![s.name.clone()];
            fields.extend(s.breed.clone());
            fields.extend(s.tag.clone());
            contains_query(&q, &fields)
        })
        .cloned()
        .collect();

    let animal_logs = state
        .animal_logs
        .iter()
        .filter(|l| {
            let mut fields = vec![l.kind.clone(), l.date.to_string()];
            if let Some(s) = species.get(&l.species_id) {
                fields.push(s.name.clone());
            }
            fields.extend(l.note.clone());
            contains_query(&q, &fields)
        })
        .cloned()
        .collect();

    let inventory = state
        .inventory_items
        .iter()
        .filter(|i| {
            let mut fields = vec![i.name.clone()];
            fields.extend(i.sku.clone());
            fields.extend(i.description.clone());
            contains_query(&q, &fields)
        })
        .cloned()
        .collect();

    let assets = state
        .assets
        .iter()
        .filter(|a| {
            let mut fields = vec![a.name.clone()];
            fields.extend(a.category.clone());
            fields.extend(a.description.clone());
            fields.extend(a.purchase_date.map(|d| d.to_string()));
            contains_query(&q, &fields)
        })
        .cloned()
        .collect();

    let liabilities = state
        .liabilities
        .iter()
        .filter(|l| {
            let mut fields = vec![l.name.clone()];
            fields.extend(l.category.clone());
            fields.extend(l.notes.clone());
            fields.extend(l.due_date.map(|d| d.to_string()));
            contains_query(&q, &fields)
        })
        .cloned()
        .collect();

    Some(SearchResults {
        transactions,
        animals,
        animal_logs,
        inventory,
        assets,
        liabilities,
    })
}

fn contains_query(q: &str, fields: &[String]) -> bool {
    fields.iter().any(|f| f.to_lowercase().contains(q))
}
