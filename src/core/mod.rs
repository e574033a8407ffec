//! Core notification hub types.

mod builder;
mod report;
mod subject;
mod subscriber;
mod subscription;

pub use builder::SubjectBuilder;
pub use report::{NotifyReport, SubscriberFailure};
pub use subject::Subject;
pub use subscriber::{FnSubscriber, Subscriber, SubscriberId};
pub use subscription::Subscription;
