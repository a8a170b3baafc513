pub(crate) mod data {
    pub(crate) mod datasources {
        pub(crate) mod receipt_validation_datasource;
        #[cfg(test)]
        pub(crate) mod test_server;
    }
    pub(crate) mod models {
        pub(crate) mod verify_receipt {
            pub(crate) mod status_response_model;
            pub(crate) mod verify_receipt_request_model;
            pub(crate) mod verify_receipt_response_model;
        }
    }
    pub(crate) mod repositories {
        pub(crate) mod receipt_repository_impl;
    }
}

pub mod domain {
    pub mod entities {
        pub mod receipt_status;
        pub mod verified_receipt;
    }
    pub mod repositories {
        pub mod receipt_repository;
    }
}

pub mod config;
pub mod constants;
pub mod errors;
pub mod util;
