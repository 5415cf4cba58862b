pub fn get_server_port() -> u16 {
    match std::env::var("RELAY_PORT") {
        Ok(port) => {
            tracing::debug!("Found RELAY_PORT: {}", port);
            match port.parse::<u16>() {
                Ok(port) => port,
                Err(_) => {
                    tracing::warn!(
                        "Custom RELAY_PORT is not a valid port number, using default port 8000"
                    );
                    8000
                }
            }
        }
        Err(_) => {
            tracing::debug!("No RELAY_PORT found, using default port 8000");
            8000
        }
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    mod get_server_port {
        use super::*;

        #[test]
        #[serial]
        fn default() {
            std::env::remove_var("RELAY_PORT");
            assert_eq!(get_server_port(), 8000);
        }

        #[test]
        #[serial]
        fn custom() {
            std::env::set_var("RELAY_PORT", "1234");
            assert_eq!(get_server_port(), 1234);
            std::env::remove_var("RELAY_PORT");
        }

        #[test]
        #[serial]
        fn custom_invalid() {
            std::env::set_var("RELAY_PORT", "abc");
            assert_eq!(get_server_port(), 8000);
            std::env::remove_var("RELAY_PORT");
        }
    }
}
