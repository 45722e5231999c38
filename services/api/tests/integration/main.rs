mod helpers;

mod application_test;
mod http_test;
mod pet_test;
mod upload_test;
