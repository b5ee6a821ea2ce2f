mod round_scenarios;
mod support;
