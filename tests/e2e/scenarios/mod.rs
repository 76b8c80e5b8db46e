mod fixtures_and_helpers;
mod reset;
