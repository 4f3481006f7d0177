//! Exposync - GPS Exposure Timer Firmware
//!
//! Main firmware binary for RP2040-based exposure timers. Listens to a
//! timing GPS receiver, keeps UTC time for every second, and pulses the
//! camera download line at the end of every exposure, in lock-step with the
//! receiver's pulse-per-second output.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use exposync_core::config::PinConfig;
use exposync_core::TriggerOutput;

use crate::channels::DEVICE;

mod channels;
mod config;
mod diagnostics;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

/// Board wiring; pins are bound statically below
const BOARD_PINS: PinConfig = PinConfig {
    gps_tx: 0,
    gps_rx: 1,
    pps: 2,
    trigger: 3,
};

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Exposync firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load();
    if config.pins != BOARD_PINS {
        warn!(
            "timer.toml pins {:?} differ from board wiring {:?}; using board wiring",
            config.pins, BOARD_PINS
        );
    }

    DEVICE.set_watchdog_timeout(config.gps.watchdog_timeout_ms);
    DEVICE.configure_exposure(config.exposure.length_s);
    if config.exposure.length_s == 0 {
        info!("Exposure synchronization disabled");
    } else {
        info!("Exposure length {} s", config.exposure.length_s);
    }

    // GPS receiver UART
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = config.gps.baudrate;

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("GPS UART initialized at {} baud", config.gps.baudrate);

    let pps = Input::new(p.PIN_2, Pull::None);

    let trigger = match TriggerOutput::new(Output::new(p.PIN_3, Level::Low)) {
        Ok(trigger) => trigger,
        Err(e) => match e {},
    };

    // Spawn tasks
    spawner.spawn(tasks::gps_rx_task(rx).unwrap());
    spawner.spawn(tasks::gps_tx_task(tx).unwrap());
    spawner.spawn(tasks::gps_task().unwrap());
    spawner.spawn(tasks::pps_task(pps).unwrap());
    spawner.spawn(tasks::watchdog_task().unwrap());
    spawner.spawn(tasks::trigger_task(trigger, config.exposure.trigger_pulse_ms).unwrap());
    spawner.spawn(tasks::debug_task().unwrap());

    info!("All tasks spawned");

    tasks::configure_receiver(&config.gps).await;

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
