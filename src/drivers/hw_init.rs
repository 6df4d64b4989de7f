//! One-shot hardware peripheral initialization and register-level helpers.
//!
//! Configures ADC channels and LEDC timers/channels using raw ESP-IDF sys
//! calls, and hosts the DHT22 single-wire bit-bang.  Called once from
//! `main()` before the event loop starts.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

use crate::error::SensorError;
#[cfg(target_os = "espidf")]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    GpioConfigFailed(i32),
    LedcInitFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc) => write!(f, "ADC1 init failed (rc={})", rc),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::LedcInitFailed(rc) => write!(f, "LEDC timer/channel config failed (rc={})", rc),
        }
    }
}

// ── ADC channel map ───────────────────────────────────────────

/// ADC1 channel wired to the left LDR divider.
pub const ADC1_CH_LDR_LEFT: u32 = 4;
/// ADC1 channel wired to the right LDR divider.
pub const ADC1_CH_LDR_RIGHT: u32 = 8;

// ── LEDC channel map ──────────────────────────────────────────

/// LEDC channel driving the shade servo (timer 0, 14-bit @ 50 Hz).
pub const LEDC_CH_SERVO: u32 = 0;
/// LEDC channel driving the buzzer (timer 1, 8-bit, variable frequency).
pub const LEDC_CH_BUZZER: u32 = 1;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the event loop; single-threaded.
    unsafe {
        init_adc()?;
        init_dht_gpio()?;
        init_ledc()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single-threaded init path or the
/// main-loop ADC read path.  No concurrent access is possible because
/// `init_adc()` completes before the event loop starts.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcInitFailed(ret));
    }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };

    for channel in [ADC1_CH_LDR_LEFT, ADC1_CH_LDR_RIGHT] {
        let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), channel, &chan_cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::AdcInitFailed(ret));
        }
    }

    info!("hw_init: ADC1 configured (CH4=LDR-left, CH8=LDR-right)");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> Result<u16, SensorError> {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract — single-threaded main-loop access only,
    // after init_adc() has completed.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return Err(SensorError::AdcReadFailed);
    }
    Ok(raw.max(0) as u16)
}

#[cfg(not(target_os = "espidf"))]
pub fn adc1_read(_channel: u32) -> Result<u16, SensorError> {
    Err(SensorError::AdcReadFailed)
}

// ── DHT22 data line ───────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_dht_gpio() -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::DHT_DATA_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed(ret));
    }
    Ok(())
}

/// Bit-bang one DHT22 frame: 40 bits, ~25 µs/70 µs high times, checksum.
///
/// Runs with interrupts enabled; a long ISR during the frame shows up as a
/// checksum mismatch and the caller retries next cycle.
#[cfg(target_os = "espidf")]
pub fn dht22_read(pin: i32) -> Result<(f32, f32), SensorError> {
    // Start signal: hold the line low for >1 ms, release, switch to input.
    unsafe {
        gpio_set_direction(pin, gpio_mode_t_GPIO_MODE_OUTPUT);
        gpio_set_level(pin, 0);
        esp_rom_delay_us(1_100);
        gpio_set_level(pin, 1);
        esp_rom_delay_us(30);
        gpio_set_direction(pin, gpio_mode_t_GPIO_MODE_INPUT);
    }

    // Sensor response preamble: ~80 µs low, ~80 µs high.
    wait_for_level(pin, false, 100).ok_or(SensorError::DhtNoResponse)?;
    wait_for_level(pin, true, 100).ok_or(SensorError::DhtNoResponse)?;
    wait_for_level(pin, false, 100).ok_or(SensorError::DhtNoResponse)?;

    let mut bytes = [0u8; 5];
    for bit in 0..40 {
        // 50 µs low preamble, then the high time encodes the bit.
        wait_for_level(pin, true, 80).ok_or(SensorError::DhtNoResponse)?;
        let high_us = wait_for_level(pin, false, 100).ok_or(SensorError::DhtNoResponse)?;
        if high_us > 45 {
            bytes[bit / 8] |= 1 << (7 - bit % 8);
        }
    }

    let sum = bytes[0]
        .wrapping_add(bytes[1])
        .wrapping_add(bytes[2])
        .wrapping_add(bytes[3]);
    if sum != bytes[4] {
        return Err(SensorError::DhtChecksumMismatch);
    }

    let humidity = u16::from_be_bytes([bytes[0], bytes[1]]) as f32 / 10.0;
    let temp_magnitude = u16::from_be_bytes([bytes[2] & 0x7F, bytes[3]]) as f32 / 10.0;
    let temperature = if bytes[2] & 0x80 != 0 {
        -temp_magnitude
    } else {
        temp_magnitude
    };
    Ok((temperature, humidity))
}

/// Busy-wait until the data line reads `high`.  Returns the time spent
/// waiting in microseconds, or `None` on timeout.
#[cfg(target_os = "espidf")]
fn wait_for_level(pin: i32, high: bool, timeout_us: i64) -> Option<i64> {
    // SAFETY: gpio_get_level / esp_timer_get_time are read-only accesses on
    // an already-configured pin; safe from main-loop context.
    let start = unsafe { esp_timer_get_time() };
    loop {
        if (unsafe { gpio_get_level(pin) } != 0) == high {
            return Some(unsafe { esp_timer_get_time() } - start);
        }
        if unsafe { esp_timer_get_time() } - start > timeout_us {
            return None;
        }
    }
}

// ── LEDC (servo + buzzer PWM) ─────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_ledc() -> Result<(), HwInitError> {
    // Servo: timer 0, 14-bit @ 50 Hz.
    let servo_timer = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_14_BIT,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        freq_hz: pins::SERVO_PWM_FREQ_HZ,
        clk_cfg: ledc_clk_cfg_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    let ret = unsafe { ledc_timer_config(&servo_timer) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::LedcInitFailed(ret));
    }

    let servo_channel = ledc_channel_config_t {
        gpio_num: pins::SERVO_PWM_GPIO,
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        channel: LEDC_CH_SERVO,
        timer_sel: ledc_timer_t_LEDC_TIMER_0,
        duty: 0,
        hpoint: 0,
        ..Default::default()
    };
    let ret = unsafe { ledc_channel_config(&servo_channel) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::LedcInitFailed(ret));
    }

    // Buzzer: timer 1, 8-bit, frequency set per-tone at runtime.
    let buzzer_timer = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_8_BIT,
        timer_num: ledc_timer_t_LEDC_TIMER_1,
        freq_hz: pins::BUZZER_TONE_HZ,
        clk_cfg: ledc_clk_cfg_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    let ret = unsafe { ledc_timer_config(&buzzer_timer) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::LedcInitFailed(ret));
    }

    let buzzer_channel = ledc_channel_config_t {
        gpio_num: pins::BUZZER_GPIO,
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        channel: LEDC_CH_BUZZER,
        timer_sel: ledc_timer_t_LEDC_TIMER_1,
        duty: 0,
        hpoint: 0,
        ..Default::default()
    };
    let ret = unsafe { ledc_channel_config(&buzzer_channel) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::LedcInitFailed(ret));
    }

    info!("hw_init: LEDC configured (CH0=servo, CH1=buzzer)");
    Ok(())
}

/// Write a raw duty count to an LEDC channel.
#[cfg(target_os = "espidf")]
pub fn ledc_set(channel: u32, duty: u32) {
    // SAFETY: channels are configured in init_ledc() before the event loop.
    unsafe {
        ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, duty);
        ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn ledc_set(_channel: u32, _duty: u32) {}

/// Retune the buzzer timer to a new tone frequency.
#[cfg(target_os = "espidf")]
pub fn ledc_set_tone(freq_hz: u32) {
    // SAFETY: timer 1 is configured in init_ledc() before the event loop.
    unsafe {
        ledc_set_freq(
            ledc_mode_t_LEDC_LOW_SPEED_MODE,
            ledc_timer_t_LEDC_TIMER_1,
            freq_hz,
        );
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn ledc_set_tone(_freq_hz: u32) {}
