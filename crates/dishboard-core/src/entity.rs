// Entity Categories
//
// Every feed event is tagged with a domain entity name. Categories are a
// closed enumeration with an explicit Unknown variant carrying a default
// display style, so the fallback path is a first-class, testable case
// instead of a dictionary miss.

use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Domain entity category tagging an incoming feed event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub enum EntityCategory {
    Order,
    Customer,
    Driver,
    Restaurant,
    RestaurantOwner,
    CustomerCare,
    CustomerCareRepresentative,
    Inquiry,
    Promotion,
    /// Anything the platform sends that we don't recognize.
    Unknown,
}

/// Dashboard metric a category contributes to between refreshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricCategory {
    TotalOrders,
    TotalUsers,
    SoldPromotions,
}

impl EntityCategory {
    /// Parse an entity name from the feed. Matching is case-insensitive;
    /// unrecognized names map to `Unknown`.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "order" => EntityCategory::Order,
            "customer" => EntityCategory::Customer,
            "driver" => EntityCategory::Driver,
            "restaurant" => EntityCategory::Restaurant,
            "restaurant_owner" => EntityCategory::RestaurantOwner,
            "customer_care" => EntityCategory::CustomerCare,
            "customer_care_representative" => EntityCategory::CustomerCareRepresentative,
            "inquiry" => EntityCategory::Inquiry,
            "promotion" => EntityCategory::Promotion,
            _ => EntityCategory::Unknown,
        }
    }

    /// Human-readable label shown on notification cards.
    pub fn display_name(&self) -> &'static str {
        match self {
            EntityCategory::Order => "Order",
            EntityCategory::Customer => "Customer",
            EntityCategory::Driver => "Driver",
            EntityCategory::Restaurant => "Restaurant",
            EntityCategory::RestaurantOwner => "Restaurant owner",
            EntityCategory::CustomerCare => "Customer care",
            EntityCategory::CustomerCareRepresentative => "Customer care agent",
            EntityCategory::Inquiry => "Inquiry",
            EntityCategory::Promotion => "Promotion",
            EntityCategory::Unknown => "Activity",
        }
    }

    /// Icon identifier for notification cards.
    pub fn icon(&self) -> &'static str {
        match self {
            EntityCategory::Order => "shopping-bag",
            EntityCategory::Customer => "user",
            EntityCategory::Driver => "truck",
            EntityCategory::Restaurant => "store",
            EntityCategory::RestaurantOwner => "briefcase",
            EntityCategory::CustomerCare => "headset",
            EntityCategory::CustomerCareRepresentative => "headset",
            EntityCategory::Inquiry => "help-circle",
            EntityCategory::Promotion => "tag",
            EntityCategory::Unknown => "bell",
        }
    }

    /// Metric this category contributes to, if any.
    ///
    /// Orders count as orders; every person-shaped entity counts as a user;
    /// promotions count as sold promotions. Inquiries and unknown categories
    /// move no counter.
    pub fn metric(&self) -> Option<MetricCategory> {
        match self {
            EntityCategory::Order => Some(MetricCategory::TotalOrders),
            EntityCategory::Customer
            | EntityCategory::Driver
            | EntityCategory::Restaurant
            | EntityCategory::RestaurantOwner
            | EntityCategory::CustomerCare
            | EntityCategory::CustomerCareRepresentative => Some(MetricCategory::TotalUsers),
            EntityCategory::Promotion => Some(MetricCategory::SoldPromotions),
            EntityCategory::Inquiry | EntityCategory::Unknown => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(EntityCategory::from_name("Order"), EntityCategory::Order);
        assert_eq!(EntityCategory::from_name("ORDER"), EntityCategory::Order);
        assert_eq!(
            EntityCategory::from_name("Restaurant_Owner"),
            EntityCategory::RestaurantOwner
        );
    }

    #[test]
    fn unrecognized_names_fall_back_to_unknown() {
        let category = EntityCategory::from_name("weather_report");
        assert_eq!(category, EntityCategory::Unknown);
        assert_eq!(category.display_name(), "Activity");
        assert_eq!(category.icon(), "bell");
    }

    #[test]
    fn order_routes_to_total_orders() {
        assert_eq!(
            EntityCategory::Order.metric(),
            Some(MetricCategory::TotalOrders)
        );
    }

    #[test]
    fn person_categories_route_to_total_users() {
        for category in [
            EntityCategory::Customer,
            EntityCategory::Driver,
            EntityCategory::Restaurant,
            EntityCategory::RestaurantOwner,
            EntityCategory::CustomerCare,
            EntityCategory::CustomerCareRepresentative,
        ] {
            assert_eq!(category.metric(), Some(MetricCategory::TotalUsers));
        }
    }

    #[test]
    fn inquiry_and_unknown_route_nowhere() {
        assert_eq!(EntityCategory::Inquiry.metric(), None);
        assert_eq!(EntityCategory::Unknown.metric(), None);
    }
}
