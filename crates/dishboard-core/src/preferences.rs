// Notification Preferences
//
// Durable per-admin switches for which categories may surface visible
// cards. Unmapped categories fall back to "enabled if anything is
// enabled" - a deliberately permissive default, distinct from the
// per-category defaults.

use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::entity::EntityCategory;

fn default_true() -> bool {
    true
}

/// Per-category notification switches. Defaults to everything on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct NotificationPreferences {
    #[serde(default = "default_true")]
    pub orders: bool,
    #[serde(default = "default_true")]
    pub restaurants: bool,
    #[serde(default = "default_true")]
    pub customers: bool,
    #[serde(default = "default_true")]
    pub drivers: bool,
    #[serde(default = "default_true")]
    pub customer_care: bool,
    #[serde(default = "default_true")]
    pub customer_care_inquiries: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            orders: true,
            restaurants: true,
            customers: true,
            drivers: true,
            customer_care: true,
            customer_care_inquiries: true,
        }
    }
}

impl NotificationPreferences {
    /// Whether events of this category may surface a visible notification.
    ///
    /// Only the visible card is gated here; the correction ledger counts
    /// accepted events regardless of preferences.
    pub fn is_enabled(&self, category: EntityCategory) -> bool {
        match category {
            EntityCategory::Order => self.orders,
            EntityCategory::Restaurant | EntityCategory::RestaurantOwner => self.restaurants,
            EntityCategory::Customer => self.customers,
            EntityCategory::Driver => self.drivers,
            EntityCategory::CustomerCare | EntityCategory::CustomerCareRepresentative => {
                self.customer_care
            }
            EntityCategory::Inquiry => self.customer_care_inquiries,
            EntityCategory::Promotion | EntityCategory::Unknown => self.any_enabled(),
        }
    }

    /// True if at least one category is switched on.
    pub fn any_enabled(&self) -> bool {
        self.orders
            || self.restaurants
            || self.customers
            || self.drivers
            || self.customer_care
            || self.customer_care_inquiries
    }

    /// Apply a partial update; unset fields keep their current value.
    pub fn merge(&mut self, patch: &PreferencesPatch) {
        if let Some(orders) = patch.orders {
            self.orders = orders;
        }
        if let Some(restaurants) = patch.restaurants {
            self.restaurants = restaurants;
        }
        if let Some(customers) = patch.customers {
            self.customers = customers;
        }
        if let Some(drivers) = patch.drivers {
            self.drivers = drivers;
        }
        if let Some(customer_care) = patch.customer_care {
            self.customer_care = customer_care;
        }
        if let Some(customer_care_inquiries) = patch.customer_care_inquiries {
            self.customer_care_inquiries = customer_care_inquiries;
        }
    }
}

/// Partial preference update; `None` leaves a flag untouched.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct PreferencesPatch {
    pub orders: Option<bool>,
    pub restaurants: Option<bool>,
    pub customers: Option<bool>,
    pub drivers: Option<bool>,
    pub customer_care: Option<bool>,
    pub customer_care_inquiries: Option<bool>,
}
