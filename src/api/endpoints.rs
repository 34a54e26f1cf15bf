//! Paths of the admin API, relative to `/admin/api/v1`.
//!
//! The upstream service spells the machine collection `fandomats`.

pub const DASHBOARD: &str = "/dashboard/";

pub mod users {
    pub const LIST: &str = "/users/";

    pub fn block(id: i64) -> String {
        format!("/users/{}/block", id)
    }

    pub fn unblock(id: i64) -> String {
        format!("/users/{}/unblock", id)
    }
}

pub mod vendors {
    pub const LIST: &str = "/vendors/";

    pub fn detail(id: i64) -> String {
        format!("/vendors/{}", id)
    }

    pub fn reset_password(id: i64) -> String {
        format!("/vendors/{}/reset-password", id)
    }
}

pub mod bottles {
    pub const LIST: &str = "/bottles/";

    pub fn detail(id: i64) -> String {
        format!("/bottles/{}", id)
    }
}

pub mod fandomats {
    pub const LIST: &str = "/fandomats/";

    pub fn detail(id: i64) -> String {
        format!("/fandomats/{}", id)
    }

    pub fn regenerate_qr(id: i64) -> String {
        format!("/fandomats/{}/regenerate-qr", id)
    }
}

pub mod rewards {
    pub const LIST: &str = "/rewards/";

    pub fn detail(id: i64) -> String {
        format!("/rewards/{}", id)
    }
}

pub mod auth {
    pub const LOGIN: &str = "/auth/login";
    pub const LOGOUT: &str = "/auth/logout";
}
