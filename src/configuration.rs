use std::time::Duration;

pub trait Configuration: Clone + Send + Sync + 'static {
    fn base_url(&self) -> String;
    fn request_timeout(&self) -> Duration;
    fn user_name(&self) -> Option<String>;
    fn user_email(&self) -> Option<String>;
}
