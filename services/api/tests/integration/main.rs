mod auth_test;
mod helpers;
mod repository_test;
mod router_test;
