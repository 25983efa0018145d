use crate::{
    catalog::{format_amount, CatalogItem},
    stripe::PaymentIntent,
};
use serde::Serialize;
use tera::{Context, Tera};

/// HTML pages, compiled once from the templates baked into the binary.
pub struct Renderer {
    tera: Tera,
}

#[derive(Serialize)]
struct Listing<'a> {
    #[serde(flatten)]
    item: &'a CatalogItem,
    price: String,
}

impl Renderer {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("base.html", include_str!("../templates/base.html")),
            ("index.html", include_str!("../templates/index.html")),
            ("checkout.html", include_str!("../templates/checkout.html")),
            ("success.html", include_str!("../templates/success.html")),
        ])?;
        Ok(Self { tera })
    }

    pub fn index(&self, items: &[CatalogItem]) -> Result<String, tera::Error> {
        let books: Vec<Listing> = items
            .iter()
            .map(|item| Listing {
                item,
                price: item.price(),
            })
            .collect();
        let mut context = Context::new();
        context.insert("books", &books);
        self.tera.render("index.html", &context)
    }

    pub fn checkout(&self, item: &CatalogItem, publishable_key: &str, return_url: &str) -> Result<String, tera::Error> {
        let mut context = Context::new();
        context.insert("error", &Option::<&str>::None);
        context.insert("title", item.title);
        context.insert("amount", &item.amount);
        context.insert("price", &item.price());
        context.insert("item", item.id);
        context.insert("publishable_key", publishable_key);
        context.insert("return_url", return_url);
        self.tera.render("checkout.html", &context)
    }

    pub fn checkout_error(&self, message: &str) -> Result<String, tera::Error> {
        self.error_page("checkout.html", message)
    }

    pub fn success(&self, intent: &PaymentIntent) -> Result<String, tera::Error> {
        let mut context = Context::new();
        context.insert("error", &Option::<&str>::None);
        context.insert("payment_intent_id", &intent.id);
        context.insert("amount", &intent.amount);
        context.insert("price", &format_amount(intent.amount));
        context.insert("status", intent.status.as_str());
        self.tera.render("success.html", &context)
    }

    pub fn success_error(&self, message: &str) -> Result<String, tera::Error> {
        self.error_page("success.html", message)
    }

    fn error_page(&self, template: &str, message: &str) -> Result<String, tera::Error> {
        let mut context = Context::new();
        context.insert("error", message);
        self.tera.render(template, &context)
    }
}
