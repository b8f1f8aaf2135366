use crate::router::{Component, RouteDescriptor, View};

/// Student Route Module
///
/// Declares the student portal layout root. Students get a read-mostly view of
/// their own records; every mutation stays on the admin side. The root's
/// 'student' role propagates to the subtree the same way the admin root's
/// does.
pub fn student_routes() -> RouteDescriptor {
    RouteDescriptor::view("/student", Component::eager(View::new("StudentLayout")))
        .requires_auth()
        .role("student")
        .children(vec![
            // /student/dashboard
            RouteDescriptor::view("dashboard", Component::eager(View::new("StudentDashboardView")))
                .named("student.dashboard")
                .title("My Dashboard"),
            RouteDescriptor::view("profile", Component::lazy_view("StudentProfileView"))
                .named("student.profile")
                .title("My Profile"),
            // The student's own class routine, read-only.
            RouteDescriptor::view("routine", Component::lazy_view("StudentRoutineView"))
                .named("student.routine"),
            RouteDescriptor::view("attendance", Component::lazy_view("StudentAttendanceView"))
                .named("student.attendance")
                .title("My Attendance"),
            RouteDescriptor::view("exams/results", Component::lazy_view("StudentResultsView"))
                .named("student.results")
                .title("Exam Results"),
            RouteDescriptor::view("fees", Component::lazy_view("StudentFeesView"))
                .named("student.fees")
                .title("My Fees"),
        ])
}
