use serde::Serialize;

/// A book that can be bought. Prices are in minor currency units (cents).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogItem {
    pub id: &'static str,
    pub title: &'static str,
    pub author: &'static str,
    pub amount: i64,
    pub description: &'static str,
    pub image: &'static str,
}

impl CatalogItem {
    pub fn price(&self) -> String {
        format_amount(self.amount)
    }
}

static BOOKS: [CatalogItem; 3] = [
    CatalogItem {
        id: "1",
        title: "The Art of Doing Science and Engineering",
        author: "Richard Hamming",
        amount: 2300,
        description: "The Art of Doing Science and Engineering is a reminder that a childlike capacity for learning and creativity are accessible to everyone.",
        image: "/images/art-science-eng.jpg",
    },
    CatalogItem {
        id: "2",
        title: "The Making of Prince of Persia: Journals 1985-1993",
        author: "Jordan Mechner",
        amount: 2500,
        description: "In The Making of Prince of Persia, on the 30th anniversary of the game\u{2019}s release, Mechner looks back at the journals he kept from 1985 to 1993..",
        image: "/images/prince-of-persia.jpg",
    },
    CatalogItem {
        id: "3",
        title: "Working in Public: The Making and Maintenance of Open Source",
        author: "Nadia Eghbal",
        amount: 2800,
        description: "Nadia Eghbal takes an inside look at modern open source and offers a model through which to understand the challenges faced by online creators.",
        image: "/images/working-in-public.jpg",
    },
];

/// The fixed, read-only list of books. Catalog amounts are the only source
/// of truth for what a checkout charges.
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    items: &'static [CatalogItem],
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    pub fn new() -> Self {
        Self { items: &BOOKS }
    }

    pub fn get(&self, id: &str) -> Option<&'static CatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn items(&self) -> &'static [CatalogItem] {
        self.items
    }
}

/// Renders minor units as dollars, e.g. `2300` -> `$23.00`.
pub fn format_amount(minor: i64) -> String {
    let sign = if minor < 0 { "-" } else { "" };
    let minor = minor.unsigned_abs();
    format!("{}${}.{:02}", sign, minor / 100, minor % 100)
}
