//! Re-entrant passwd/group database lookups.
//!
//! Uses `getpwuid_r`/`getgrgid_r` so concurrent report threads can resolve
//! names without racing over the static buffers of the non-`_r` interfaces.
//! A `None` result means the database has no entry for the id; callers fall
//! back to the decimal form.

use std::ffi::CStr;
use std::mem::MaybeUninit;
use std::ptr;

/// Looks up the user name for `uid`; `None` when unknown or on lookup error.
pub(crate) fn lookup_user_name(uid: u32) -> Option<String> {
    let mut buffer = vec![0_u8; 1024];
    loop {
        let mut pwd = MaybeUninit::<libc::passwd>::zeroed();
        let mut result: *mut libc::passwd = ptr::null_mut();
        // SAFETY: all pointers are valid for the duration of the call; `pwd`
        // and `buffer` are owned by this function and `result` receives the
        // output pointer.
        let errno = unsafe {
            libc::getpwuid_r(
                uid as libc::uid_t,
                pwd.as_mut_ptr(),
                buffer.as_mut_ptr() as *mut libc::c_char,
                buffer.len(),
                &mut result,
            )
        };

        if errno == 0 {
            if result.is_null() {
                return None;
            }
            // SAFETY: `result` is non-null, so `pwd` was initialised and
            // `pw_name` points at a C string backed by `buffer`.
            let name = unsafe { CStr::from_ptr(pwd.assume_init().pw_name) };
            return Some(name.to_string_lossy().into_owned());
        }

        if errno == libc::ERANGE {
            buffer.resize(buffer.len().saturating_mul(2), 0);
            continue;
        }

        return None;
    }
}

/// Looks up the group name for `gid`; `None` when unknown or on lookup error.
pub(crate) fn lookup_group_name(gid: u32) -> Option<String> {
    let mut buffer = vec![0_u8; 1024];
    loop {
        let mut grp = MaybeUninit::<libc::group>::zeroed();
        let mut result: *mut libc::group = ptr::null_mut();
        // SAFETY: all pointers are valid for the duration of the call; `grp`
        // and `buffer` are owned by this function and `result` receives the
        // output pointer.
        let errno = unsafe {
            libc::getgrgid_r(
                gid as libc::gid_t,
                grp.as_mut_ptr(),
                buffer.as_mut_ptr() as *mut libc::c_char,
                buffer.len(),
                &mut result,
            )
        };

        if errno == 0 {
            if result.is_null() {
                return None;
            }
            // SAFETY: `result` is non-null, so `grp` was initialised and
            // `gr_name` points at a C string backed by `buffer`.
            let name = unsafe { CStr::from_ptr(grp.assume_init().gr_name) };
            return Some(name.to_string_lossy().into_owned());
        }

        if errno == libc::ERANGE {
            buffer.resize(buffer.len().saturating_mul(2), 0);
            continue;
        }

        return None;
    }
}
