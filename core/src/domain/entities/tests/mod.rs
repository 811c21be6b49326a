mod revocation_tests;
mod token_tests;
