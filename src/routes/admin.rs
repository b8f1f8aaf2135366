use crate::router::{Component, RouteDescriptor, View};

/// Admin Route Module
///
/// Declares the admin layout root and every screen nested under it. The root
/// carries `requires_auth` and the 'admin' role, which the table propagates to
/// the whole subtree, so no individual screen can be left unprotected by
/// omission.
///
/// Loading strategy: the screens an administrator hits on every visit
/// (dashboard and the main list views) are eager; create/edit/detail forms and
/// report screens are lazy, fetched on first navigation and cached for the
/// lifetime of the process.
pub fn admin_routes() -> RouteDescriptor {
    RouteDescriptor::view("/admin", Component::eager(View::new("MainLayout")))
        .requires_auth()
        .role("admin")
        .children(vec![
            // /admin/dashboard
            RouteDescriptor::view("dashboard", Component::eager(View::new("DashboardView")))
                .named("dashboard")
                .title("Dashboard"),
            // --- Students ---
            // /admin/students
            RouteDescriptor::view("students", Component::eager(View::new("StudentsView")))
                .named("students.index")
                .title("Students"),
            RouteDescriptor::view("students/create", Component::lazy_view("StudentCreateView"))
                .named("students.create"),
            RouteDescriptor::view("students/edit/:id", Component::lazy_view("StudentEditView"))
                .named("students.edit"),
            RouteDescriptor::view("students/view/:id", Component::lazy_view("StudentDetailsView"))
                .named("students.view"),
            // Printable ID card for a single student.
            RouteDescriptor::view("students/id-card/:id", Component::lazy_view("StudentIdCard"))
                .named("students.id-card"),
            // --- Teachers ---
            // /admin/teachers
            RouteDescriptor::view("teachers", Component::eager(View::new("TeachersView")))
                .named("teachers.index")
                .title("Teachers"),
            RouteDescriptor::view("teachers/create", Component::lazy_view("TeacherCreateView"))
                .named("teachers.create"),
            RouteDescriptor::view("teachers/edit/:id", Component::lazy_view("TeacherEditView"))
                .named("teachers.edit"),
            RouteDescriptor::view("teachers/view/:id", Component::lazy_view("TeacherProfileView"))
                .named("teachers.view"),
            RouteDescriptor::view("teachers/id-card/:id", Component::lazy_view("TeacherIdCard"))
                .named("teachers.id-card"),
            // --- Routines & Academics ---
            RouteDescriptor::view("routines", Component::lazy_view("RoutineListView"))
                .named("routines.index")
                .title("Class Routines"),
            RouteDescriptor::view("routines/create", Component::lazy_view("RoutineCreateView"))
                .named("routines.create"),
            RouteDescriptor::view("routines/edit/:id", Component::lazy_view("RoutineEditView"))
                .named("routines.edit"),
            RouteDescriptor::view("academic/subjects", Component::lazy_view("SubjectCreateView"))
                .named("academic.subjects"),
            // --- Attendance ---
            RouteDescriptor::view("attendance/take", Component::lazy_view("TakeAttendance"))
                .named("attendance.take")
                .title("Take Attendance"),
            RouteDescriptor::view("attendance/report", Component::lazy_view("AttendanceReport"))
                .named("attendance.report"),
            // The print layout renders without the admin shell chrome, so it
            // opts out of the /admin prefix with an absolute path. It still
            // inherits the subtree's auth metadata.
            RouteDescriptor::view("/attendance/print-report", Component::lazy_view("AttendancePrint"))
                .named("attendance.print"),
            // --- Exams ---
            RouteDescriptor::view("exam/list", Component::lazy_view("ExamList"))
                .named("exams.index")
                .title("Exams"),
            RouteDescriptor::view("exam/marks-entry", Component::lazy_view("MarksEntry"))
                .named("exams.marks"),
            // --- Fees ---
            RouteDescriptor::view("fees", Component::lazy_view("FeesListView"))
                .named("fees.index")
                .title("Fees"),
            RouteDescriptor::view("fees/collect", Component::lazy_view("FeeCollectView"))
                .named("fees.collect"),
            // --- HR ---
            RouteDescriptor::view("hr/staff", Component::lazy_view("StaffListView"))
                .named("hr.staff")
                .title("Staff"),
            // --- Library ---
            RouteDescriptor::view("library/books", Component::lazy_view("LibraryBooksView"))
                .named("library.books")
                .title("Library"),
            RouteDescriptor::view("library/issue", Component::lazy_view("BookIssueView"))
                .named("library.issue"),
            // --- Settings ---
            RouteDescriptor::view("settings", Component::lazy_view("GeneralSettings"))
                .named("settings")
                .title("General Settings"),
        ])
}
