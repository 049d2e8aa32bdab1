use std::fmt;
use std::str::FromStr;

/// Who may invoke an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    /// A session for the target user, or any admin session. Checked by the handler.
    SelfOrAdmin,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Register,
    Login,
    GoogleAuth,
    UpdateProfile,
    ChangePassword,
    GetUsers,
    GetUser,
    UpdateUser,
    UpdateUserStatus,
    DeleteUser,
    GetProducts,
    GetProduct,
    CreateProduct,
    UpdateProduct,
    DeleteProduct,
    GetCourses,
    GetCourse,
    CreateCourse,
    UpdateCourse,
    DeleteCourse,
    Enroll,
    GetEnrollments,
    RecordPayment,
    LogActivity,
    GetActivity,
    SubmitInquiry,
    GetInquiries,
    UpdateInquiryStatus,
    DeleteInquiry,
    UploadFile,
    GetFile,
    GetFiles,
    DeleteFile,
    GetSettings,
    UpdateSettings,
    SendNotification,
    GetNotifications,
}

impl Action {
    pub const ALL: [Action; 37] = [
        Action::Register,
        Action::Login,
        Action::GoogleAuth,
        Action::UpdateProfile,
        Action::ChangePassword,
        Action::GetUsers,
        Action::GetUser,
        Action::UpdateUser,
        Action::UpdateUserStatus,
        Action::DeleteUser,
        Action::GetProducts,
        Action::GetProduct,
        Action::CreateProduct,
        Action::UpdateProduct,
        Action::DeleteProduct,
        Action::GetCourses,
        Action::GetCourse,
        Action::CreateCourse,
        Action::UpdateCourse,
        Action::DeleteCourse,
        Action::Enroll,
        Action::GetEnrollments,
        Action::RecordPayment,
        Action::LogActivity,
        Action::GetActivity,
        Action::SubmitInquiry,
        Action::GetInquiries,
        Action::UpdateInquiryStatus,
        Action::DeleteInquiry,
        Action::UploadFile,
        Action::GetFile,
        Action::GetFiles,
        Action::DeleteFile,
        Action::GetSettings,
        Action::UpdateSettings,
        Action::SendNotification,
        Action::GetNotifications,
    ];

    /// Wire name used in the `action` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Register => "register",
            Action::Login => "login",
            Action::GoogleAuth => "googleAuth",
            Action::UpdateProfile => "updateProfile",
            Action::ChangePassword => "changePassword",
            Action::GetUsers => "getUsers",
            Action::GetUser => "getUser",
            Action::UpdateUser => "updateUser",
            Action::UpdateUserStatus => "updateUserStatus",
            Action::DeleteUser => "deleteUser",
            Action::GetProducts => "getProducts",
            Action::GetProduct => "getProduct",
            Action::CreateProduct => "createProduct",
            Action::UpdateProduct => "updateProduct",
            Action::DeleteProduct => "deleteProduct",
            Action::GetCourses => "getCourses",
            Action::GetCourse => "getCourse",
            Action::CreateCourse => "createCourse",
            Action::UpdateCourse => "updateCourse",
            Action::DeleteCourse => "deleteCourse",
            Action::Enroll => "enroll",
            Action::GetEnrollments => "getEnrollments",
            Action::RecordPayment => "recordPayment",
            Action::LogActivity => "logActivity",
            Action::GetActivity => "getActivity",
            Action::SubmitInquiry => "submitInquiry",
            Action::GetInquiries => "getInquiries",
            Action::UpdateInquiryStatus => "updateInquiryStatus",
            Action::DeleteInquiry => "deleteInquiry",
            Action::UploadFile => "uploadFile",
            Action::GetFile => "getFile",
            Action::GetFiles => "getFiles",
            Action::DeleteFile => "deleteFile",
            Action::GetSettings => "getSettings",
            Action::UpdateSettings => "updateSettings",
            Action::SendNotification => "sendNotification",
            Action::GetNotifications => "getNotifications",
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Action::Register
            | Action::Login
            | Action::GoogleAuth
            | Action::GetProducts
            | Action::GetProduct
            | Action::GetCourses
            | Action::GetCourse
            | Action::SubmitInquiry
            | Action::GetFile
            | Action::GetSettings => Access::Public,

            Action::GetUser
            | Action::UpdateProfile
            | Action::ChangePassword
            | Action::Enroll
            | Action::GetEnrollments
            | Action::RecordPayment
            | Action::LogActivity
            | Action::GetActivity
            | Action::GetNotifications => Access::SelfOrAdmin,

            Action::GetUsers
            | Action::UpdateUser
            | Action::UpdateUserStatus
            | Action::DeleteUser
            | Action::CreateProduct
            | Action::UpdateProduct
            | Action::DeleteProduct
            | Action::CreateCourse
            | Action::UpdateCourse
            | Action::DeleteCourse
            | Action::GetInquiries
            | Action::UpdateInquiryStatus
            | Action::DeleteInquiry
            | Action::UploadFile
            | Action::GetFiles
            | Action::DeleteFile
            | Action::UpdateSettings
            | Action::SendNotification => Access::Admin,
        }
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("Invalid action")]
pub struct UnknownAction;

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .iter()
            .copied()
            .find(|action| action.as_str() == s)
            .ok_or(UnknownAction)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
