//! Chronolume - WiFi NTP Clock Firmware
//!
//! Main firmware binary for the Raspberry Pi Pico W with a 170x320 ST7789
//! TFT. Joins the configured network, keeps time over SNTP and shows
//! "HH:MM" in a color that steps through a small palette.

#![no_std]
#![no_main]

use cyw43_pio::{PioSpi, DEFAULT_CLOCK_DIVIDER};
use defmt::*;
use embassy_executor::Spawner;
use embassy_net::{Config as NetConfig, StackResources};
use embassy_rp::bind_interrupts;
use embassy_rp::clocks::RoscRng;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::{PIO0, SPI1};
use embassy_rp::pio::{InterruptHandler as PioInterruptHandler, Pio};
use embassy_rp::spi::Spi;
use embassy_time::Delay;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use chronolume_core::config::{ClockConfig, DEFAULT_BACKLIGHT_PIN};
use chronolume_core::controller::Controller;
use chronolume_display::{PanelConfig, St7789};
use chronolume_hal_rp2040::hal::spi::{Mode, SpiConfig};
use chronolume_hal_rp2040::spi::embassy_config;
use chronolume_hal_rp2040::{PinBank, RpOutput, RpSpi};

use crate::platform::{CywWifiLink, EmbassyClock, SntpTimeService};

mod channels;
mod config;
mod platform;
mod tasks;

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => PioInterruptHandler<PIO0>;
});

/// Panel SPI clock
const DISPLAY_SPI_HZ: u32 = 40_000_000;

/// Sockets: DHCP, DNS, SNTP, plus headroom
const NET_SOCKETS: usize = 4;

type Display = St7789<
    RpSpi<'static, SPI1>,
    RpOutput<'static>,
    RpOutput<'static>,
    RpOutput<'static>,
    RpOutput<'static>,
    Delay,
>;

static CYW43_STATE: StaticCell<cyw43::State> = StaticCell::new();
static NET_RESOURCES: StaticCell<StackResources<NET_SOCKETS>> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Chronolume clock firmware starting...");

    let p = embassy_rp::init(Default::default());
    let config = config::load();

    // Radio: Pico W fixed wiring (PWR 23, DIO 24, CS 25, CLK 29)
    let fw = include_bytes!("../cyw43-firmware/43439A0.bin");
    let clm = include_bytes!("../cyw43-firmware/43439A0_clm.bin");

    let pwr = Output::new(p.PIN_23, Level::Low);
    let cs = Output::new(p.PIN_25, Level::High);
    let mut pio = Pio::new(p.PIO0, Irqs);
    let spi = PioSpi::new(
        &mut pio.common,
        pio.sm0,
        DEFAULT_CLOCK_DIVIDER,
        pio.irq0,
        cs,
        p.PIN_24,
        p.PIN_29,
        p.DMA_CH0,
    );

    let state = CYW43_STATE.init(cyw43::State::new());
    let (net_device, mut control, runner) = cyw43::new(state, pwr, spi, fw).await;
    spawner.spawn(tasks::cyw43_task(runner)).unwrap();

    control.init(clm).await;
    control
        .set_power_management(cyw43::PowerManagementMode::PowerSave)
        .await;
    info!("CYW43 initialized");

    let seed = RoscRng.next_u64();
    let (stack, runner) = embassy_net::new(
        net_device,
        NetConfig::dhcpv4(Default::default()),
        NET_RESOURCES.init(StackResources::new()),
        seed,
    );
    spawner.spawn(tasks::net_task(runner)).unwrap();
    spawner.spawn(tasks::wifi_task(control, stack)).unwrap();
    spawner.spawn(tasks::ntp_task(stack)).unwrap();
    info!("Network tasks started");

    // Spare GPIOs; the panel and radio pins are wired above and below
    let mut bank = PinBank::new();
    bank.deposit(0, p.PIN_0.into());
    bank.deposit(1, p.PIN_1.into());
    bank.deposit(2, p.PIN_2.into());
    bank.deposit(3, p.PIN_3.into());
    bank.deposit(4, p.PIN_4.into());
    bank.deposit(5, p.PIN_5.into());
    bank.deposit(6, p.PIN_6.into());
    bank.deposit(7, p.PIN_7.into());
    bank.deposit(13, p.PIN_13.into());
    bank.deposit(14, p.PIN_14.into());
    bank.deposit(15, p.PIN_15.into());
    bank.deposit(16, p.PIN_16.into());
    bank.deposit(17, p.PIN_17.into());
    bank.deposit(18, p.PIN_18.into());
    bank.deposit(19, p.PIN_19.into());
    bank.deposit(20, p.PIN_20.into());
    bank.deposit(21, p.PIN_21.into());
    bank.deposit(22, p.PIN_22.into());
    bank.deposit(26, p.PIN_26.into());
    bank.deposit(27, p.PIN_27.into());
    bank.deposit(28, p.PIN_28.into());

    let display = init_display(
        &config,
        &mut bank,
        Spi::new_blocking_txonly(
            p.SPI1,
            p.PIN_10,
            p.PIN_11,
            embassy_config(&SpiConfig::with_mode(DISPLAY_SPI_HZ, Mode::Mode0)),
        ),
        Output::new(p.PIN_8, Level::Low),
        Output::new(p.PIN_9, Level::High),
        Output::new(p.PIN_12, Level::High),
    );
    info!("Display wired (backlight GPIO{})", config.display.backlight_pin);

    let mut controller = Controller::new(
        config,
        CywWifiLink,
        SntpTimeService::new(),
        display,
        EmbassyClock,
    );
    controller.run().await;
}

/// Build the ST7789 driver; the backlight pin comes from the config
fn init_display(
    config: &ClockConfig,
    bank: &mut PinBank,
    spi: Spi<'static, SPI1, embassy_rp::spi::Blocking>,
    dc: Output<'static>,
    cs: Output<'static>,
    rst: Output<'static>,
) -> Display {
    let pin = match bank.take(config.display.backlight_pin) {
        Ok(pin) => pin,
        Err(e) => {
            warn!(
                "Backlight GPIO{} unavailable ({:?}), using GPIO{}",
                config.display.backlight_pin, e, DEFAULT_BACKLIGHT_PIN
            );
            unwrap!(bank.take(DEFAULT_BACKLIGHT_PIN))
        }
    };

    St7789::new(
        RpSpi::new(spi),
        RpOutput::new(dc),
        RpOutput::new(cs),
        RpOutput::new(rst),
        RpOutput::new(Output::new(pin, Level::Low)),
        Delay,
        PanelConfig::ST7789_170X320,
    )
}
