// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn config_defaults() {
    let config = Config::new("/srv/buildr");
    assert_eq!(config.lock_path, PathBuf::from("/srv/buildr/buildrd.pid"));
    assert_eq!(config.log_path, PathBuf::from("/srv/buildr/buildrd.log"));
    assert_eq!(config.addr, SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)));
    assert_eq!(config.tick_interval, Some(DEFAULT_TICK));
    assert!(config.bootstrap);
}

#[yare::parameterized(
    loopback = { false, Ipv4Addr::LOCALHOST },
    exposed  = { true,  Ipv4Addr::UNSPECIFIED },
)]
fn expose_selects_bind_address(expose: bool, ip: Ipv4Addr) {
    let config = Config::new(".").port(9000).exposed(expose);
    assert_eq!(config.addr, SocketAddr::from((ip, 9000)));
}

#[test]
fn zero_tick_disables_driver() {
    let config = Config::new(".").tick_every(Duration::ZERO);
    assert_eq!(config.tick_interval, None);

    let config = Config::new(".").tick_every(Duration::from_millis(250));
    assert_eq!(config.tick_interval, Some(Duration::from_millis(250)));
}
