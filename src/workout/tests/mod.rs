mod fixture;
mod render_test;
