use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use gpiochip_info::{chip_paths, AsGpioChip, Chip, Errno, ErrorKind, IoctlRequest};

/// The GPIO chips on this machine that the test user can open.
///
/// Tests that need real hardware do nothing when this is empty.
fn available_chips() -> Vec<PathBuf> {
    chip_paths()
        .unwrap_or_default()
        .into_iter()
        .filter(|p| Chip::open(p).is_ok())
        .collect()
}

#[test]
fn open_missing_device() {
    let err = Chip::open("/dev/gpiochip999").unwrap_err();
    match err.kind() {
        ErrorKind::DeviceOpen { path, source } => {
            assert_eq!(path, Path::new("/dev/gpiochip999"));
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        kind => panic!("unexpected error kind {kind:?}"),
    }
    assert_eq!(err.errno(), Some(Errno::ENOENT));
}

#[test]
fn open_regular_file() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml");
    let err = Chip::open(&path).unwrap_err();
    assert!(
        matches!(err.kind(), ErrorKind::DeviceOpen { .. }),
        "{err:?}"
    );
}

#[test]
fn queries_on_non_gpio_device() {
    let chip = Chip::open("/dev/null").unwrap();

    let err = chip.chip_info().unwrap_err();
    assert!(matches!(
        err.kind(),
        ErrorKind::Ioctl {
            request: IoctlRequest::GetChipInfo,
            errno: Errno::ENOTTY
        }
    ));

    let err = chip.line_info(3).unwrap_err();
    assert!(matches!(
        err.kind(),
        ErrorKind::Ioctl {
            request: IoctlRequest::GetLineInfo,
            errno: Errno::ENOTTY
        }
    ));

    chip.close().unwrap();
}

#[test]
fn handle_shared_behind_mutex() {
    let chip = Arc::new(Mutex::new(Chip::open("/dev/null").unwrap()));

    let workers: Vec<_> = (0..4)
        .map(|offset| {
            let chip = Arc::clone(&chip);
            std::thread::spawn(move || {
                let chip = chip.lock().unwrap();
                chip.line_info(offset).unwrap_err().errno()
            })
        })
        .collect();

    for worker in workers {
        assert_eq!(worker.join().unwrap(), Some(Errno::ENOTTY));
    }
}

#[test]
fn chip_paths_are_gpio_devices() {
    for path in available_chips() {
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("gpiochip"), "{}", path.display());
        assert!(path.starts_with("/dev"));
    }
}

#[test]
fn line_info_matches_offset() {
    for path in available_chips() {
        let chip = Chip::open(&path).unwrap();
        let info = chip.chip_info().unwrap();

        for (offset, line) in (0..info.num_lines()).zip(chip.line_infos().unwrap()) {
            let line = line.unwrap();
            assert_eq!(line.offset(), offset);
            assert!(line.attributes().len() <= gpiochip_info::GPIO_LINE_NUM_ATTRS_MAX);
        }
        chip.close().unwrap();
    }
}

#[test]
fn line_info_out_of_range() {
    for path in available_chips() {
        let chip = Chip::open(&path).unwrap();
        let lines = chip.chip_info().unwrap().num_lines();

        let err = chip.line_info(lines).unwrap_err();
        match err.kind() {
            ErrorKind::Ioctl { request, errno } => {
                assert_eq!(*request, IoctlRequest::GetLineInfo);
                assert!(
                    matches!(errno, Errno::EINVAL | Errno::ENODEV),
                    "{}: {errno}",
                    path.display()
                );
            }
            kind => panic!("unexpected error kind {kind:?}"),
        }
    }
}

#[test]
fn borrowed_handle_sees_same_chip() {
    for path in available_chips() {
        let chip = Chip::open(&path).unwrap();
        let borrowed = chip.borrow();
        assert_eq!(chip.chip_info().unwrap(), borrowed.chip_info().unwrap());
    }
}
