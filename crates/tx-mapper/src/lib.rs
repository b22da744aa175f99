mod config_mapper;
mod test_mapper;
mod xml_utils;

pub use config_mapper::{
    configuration_from_element, configuration_to_element, parse_configuration,
    write_configuration, CONFIGURATION_ROOT,
};
pub use test_mapper::{parse_test, test_from_element, test_to_element, write_test, TEST_ROOT};
