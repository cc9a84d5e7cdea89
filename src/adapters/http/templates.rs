use std::sync::Arc;
use tera::Tera;

/// Template engine wrapper for rendering HTML templates
#[derive(Clone)]
pub struct TemplateEngine {
  tera: Arc<Tera>,
}

impl TemplateEngine {
  /// Load every `templates/**/*.html.tera` file
  pub fn new() -> Result<Self, tera::Error> {
    let mut tera = Tera::new("templates/**/*.html.tera")?;
    tera.autoescape_on(vec!["html.tera", ".html"]);

    Ok(Self::from_tera(tera))
  }

  pub fn from_tera(tera: Tera) -> Self {
    Self {
      tera: Arc::new(tera),
    }
  }

  pub fn render(&self, template: &str, context: &tera::Context) -> Result<String, tera::Error> {
    self.tera.render(template, context)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::application::dashboard::DashboardResponse;
  use crate::domain::catalog::DashboardStats;

  #[test]
  fn test_shipped_templates_parse() {
    let engine = TemplateEngine::new().expect("templates should parse");

    let mut context = tera::Context::new();
    context.insert("error", &None::<String>);
    context.insert("username", "");
    let html = engine
      .render("pages/admin_login.html.tera", &context)
      .unwrap();
    assert!(html.contains("<form"));
  }

  #[test]
  fn test_dashboard_renders_without_session_data() {
    let engine = TemplateEngine::new().expect("templates should parse");
    let dashboard = DashboardResponse {
      shop_name: Some("Key Depot".to_string()),
      stats: DashboardStats::default(),
      products: Vec::new(),
      low_stock_count: 0,
      low_stock_threshold: 5,
      visitor_count: 3,
      recent_orders: Vec::new(),
    };

    let mut context = tera::Context::new();
    context.insert("dashboard", &dashboard);
    let html = engine
      .render("pages/admin_dashboard.html.tera", &context)
      .unwrap();
    assert!(html.contains("Key Depot"));
    assert!(html.contains("Visitors: 3"));
  }

  #[test]
  fn test_autoescape() {
    let mut tera = Tera::default();
    tera.autoescape_on(vec!["html.tera"]);
    tera
      .add_raw_template("t.html.tera", "{{ value }}")
      .unwrap();
    let engine = TemplateEngine::from_tera(tera);

    let mut context = tera::Context::new();
    context.insert("value", "<b>");
    assert_eq!(engine.render("t.html.tera", &context).unwrap(), "&lt;b&gt;");
  }
}
