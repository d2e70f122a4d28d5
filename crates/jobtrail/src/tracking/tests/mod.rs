mod common;
mod credentials;
mod identity;
mod store;
