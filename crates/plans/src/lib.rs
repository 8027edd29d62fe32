//! Subscription plans and the application modules they bundle.

pub mod app_module;
pub mod plan_module;
pub mod subscription_plan;

pub use app_module::AppModule;
pub use plan_module::{
    CreateSubscriptionPlanModule, SubscriptionPlanModule, UpdateSubscriptionPlanModule,
};
pub use subscription_plan::{CreateSubscriptionPlan, SubscriptionPlan, UpdateSubscriptionPlan};
