use serde::{Deserialize, Serialize};

/// Descriptive data attached to the initialization call only.
///
/// The gateway shows these on its payment page. When `product` is absent the whole
/// description is left out of the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDescription {
    /// Product label shown to the payer.
    pub product: Option<String>,
    /// Order total in minor units, as the merchant wants it displayed.
    pub total: Option<i64>,
    /// Name of the payment page template.
    pub template_tag: Option<String>,
    /// Payment page language code.
    pub language: Option<String>,
}

impl PaymentDescription {
    pub fn new(product: impl Into<String>, total: i64) -> Self {
        Self {
            product: Some(product.into()),
            total: Some(total),
            ..Self::default()
        }
    }

    pub fn with_template_tag(mut self, template_tag: impl Into<String>) -> Self {
        self.template_tag = Some(template_tag.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Whether this description contributes any fields to the init request.
    pub fn is_sent(&self) -> bool {
        self.product.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_sent_only_with_product() {
        assert!(PaymentDescription::new("Order payment", 1231).is_sent());

        let without_product = PaymentDescription {
            total: Some(1231),
            ..PaymentDescription::default()
        };
        assert!(!without_product.is_sent());
    }
}
