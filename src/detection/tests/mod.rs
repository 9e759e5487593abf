mod fixture;
mod lazy_test;
mod response_test;
