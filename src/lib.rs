// Library for tests to access modules

pub mod config;
pub mod convert;
pub mod docker_repo;
pub mod models;
pub mod sink;
pub mod worker;
